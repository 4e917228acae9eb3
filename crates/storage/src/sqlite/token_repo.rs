use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{StorageError, TokenRepository};

use super::SqliteRepository;

const TOKEN_KEY: &str = "token";

#[async_trait]
impl TokenRepository for SqliteRepository {
    async fn get_token(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = ?1")
            .bind(TOKEN_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_token(&self, token: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO local_storage (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(TOKEN_KEY)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(TOKEN_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
