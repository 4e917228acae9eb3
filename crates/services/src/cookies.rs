use std::sync::Arc;

use chrono::Duration;
use qshell_core::Clock;
use storage::repository::{CookieRecord, CookieRepository, StorageError};

pub const DEFAULT_COOKIE_DAYS: i64 = 365;

/// Named string values with an expiry, like `document.cookie`.
#[derive(Clone)]
pub struct CookieStore {
    repo: Arc<dyn CookieRepository>,
    clock: Clock,
}

impl CookieStore {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn CookieRepository>) -> Self {
        Self { repo, clock }
    }

    /// Value of a live cookie; expired cookies are purged and read as absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        let Some(cookie) = self.repo.get_cookie(name).await? else {
            return Ok(None);
        };
        if cookie.expires_at <= self.clock.now() {
            self.repo.delete_cookie(name).await?;
            return Ok(None);
        }
        Ok(Some(cookie.value))
    }

    /// Store `value` under `name` for `days` days from now.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cookie cannot be stored.
    pub async fn set(&self, name: &str, value: &str, days: i64) -> Result<(), StorageError> {
        let cookie = CookieRecord {
            name: name.to_owned(),
            value: value.to_owned(),
            expires_at: self.clock.now() + Duration::days(days),
        };
        self.repo.put_cookie(&cookie).await
    }
}
