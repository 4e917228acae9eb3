use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a cookie. Expiry is enforced by the reader, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait CookieRepository: Send + Sync {
    /// Fetch a cookie by name, expired or not.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_cookie(&self, name: &str) -> Result<Option<CookieRecord>, StorageError>;

    /// Insert or overwrite a cookie.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cookie cannot be stored.
    async fn put_cookie(&self, cookie: &CookieRecord) -> Result<(), StorageError>;

    /// Remove a cookie; removing a missing cookie is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_cookie(&self, name: &str) -> Result<(), StorageError>;
}

/// Client-side storage of the single bearer token.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_token(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the token cannot be stored.
    async fn save_token(&self, token: &str) -> Result<(), StorageError>;

    /// Clearing when no token is stored is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_token(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    cookies: Arc<Mutex<HashMap<String, CookieRecord>>>,
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl CookieRepository for InMemoryRepository {
    async fn get_cookie(&self, name: &str) -> Result<Option<CookieRecord>, StorageError> {
        let guard = self.cookies.lock().map_err(poisoned)?;
        Ok(guard.get(name).cloned())
    }

    async fn put_cookie(&self, cookie: &CookieRecord) -> Result<(), StorageError> {
        let mut guard = self.cookies.lock().map_err(poisoned)?;
        guard.insert(cookie.name.clone(), cookie.clone());
        Ok(())
    }

    async fn delete_cookie(&self, name: &str) -> Result<(), StorageError> {
        let mut guard = self.cookies.lock().map_err(poisoned)?;
        guard.remove(name);
        Ok(())
    }
}

#[async_trait]
impl TokenRepository for InMemoryRepository {
    async fn get_token(&self) -> Result<Option<String>, StorageError> {
        let guard = self.token.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        let mut guard = self.token.lock().map_err(poisoned)?;
        *guard = Some(token.to_owned());
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        let mut guard = self.token.lock().map_err(poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates client-state repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub cookies: Arc<dyn CookieRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let cookies: Arc<dyn CookieRepository> = Arc::new(repo.clone());
        let tokens: Arc<dyn TokenRepository> = Arc::new(repo);
        Self { cookies, tokens }
    }
}
