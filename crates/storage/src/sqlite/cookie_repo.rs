use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{CookieRecord, CookieRepository, StorageError};

use super::SqliteRepository;

fn conn<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl CookieRepository for SqliteRepository {
    async fn get_cookie(&self, name: &str) -> Result<Option<CookieRecord>, StorageError> {
        let row = sqlx::query("SELECT name, value, expires_at FROM cookies WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(ser)?;
        Ok(Some(CookieRecord {
            name: row.try_get("name").map_err(ser)?,
            value: row.try_get("value").map_err(ser)?,
            expires_at,
        }))
    }

    async fn put_cookie(&self, cookie: &CookieRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cookies (name, value, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at
            ",
        )
        .bind(&cookie.name)
        .bind(&cookie.value)
        .bind(cookie.expires_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn delete_cookie(&self, name: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM cookies WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
