use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error, SqlitePool};
use teloxide::types::ChatId;
use thiserror::Error;

use self::models::StorageEntry;

pub mod models;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to parse database URL: {0}")]
    UrlParse(String),
    #[error("Database error: {0}")]
    Sqlx(#[from] Error),
    #[error("Failed to prepare schema: {0}")]
    Schema(String),
    #[error("Failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS local_storage (
    chat_id INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (chat_id, key)
)";

pub async fn init_db(database_url: &str) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| DatabaseError::UrlParse(e.to_string()))?
        .create_if_missing(true);

    // Every connection to an in-memory database sees its own empty database.
    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    ensure_schema(&pool).await?;
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::Schema(e.to_string()))?;
    Ok(())
}

/// Per-chat key/value storage, the bot's counterpart of browser local storage.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_item(&self, chat: ChatId, key: &str) -> Result<Option<String>, DatabaseError> {
        let entry = sqlx::query_as::<_, StorageEntry>(
            "SELECT chat_id, key, value, updated_at FROM local_storage WHERE chat_id = $1 AND key = $2",
        )
        .bind(chat.0)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry.map(|entry| entry.value))
    }

    pub async fn set_item(&self, chat: ChatId, key: &str, value: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO local_storage (chat_id, key, value, updated_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT (chat_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(chat.0)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_item(&self, chat: ChatId, key: &str) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM local_storage WHERE chat_id = $1 AND key = $2")
            .bind(chat.0)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Chats that currently hold a value under `key`, oldest write first.
    pub async fn chats_with_item(&self, key: &str) -> Result<Vec<ChatId>, DatabaseError> {
        let entries = sqlx::query_as::<_, StorageEntry>(
            "SELECT chat_id, key, value, updated_at FROM local_storage WHERE key = $1 ORDER BY updated_at",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries.into_iter().map(|entry| ChatId(entry.chat_id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> LocalStorage {
        LocalStorage::new(init_db("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn set_overwrites_and_remove_clears() {
        let storage = storage().await;
        let chat = ChatId(42);

        storage.set_item(chat, "token", "a").await.unwrap();
        storage.set_item(chat, "token", "b").await.unwrap();
        assert_eq!(storage.get_item(chat, "token").await.unwrap().as_deref(), Some("b"));

        storage.remove_item(chat, "token").await.unwrap();
        assert_eq!(storage.get_item(chat, "token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn items_are_scoped_per_chat() {
        let storage = storage().await;
        storage.set_item(ChatId(1), "token", "one").await.unwrap();
        storage.set_item(ChatId(2), "user", "{}").await.unwrap();

        assert_eq!(storage.get_item(ChatId(2), "token").await.unwrap(), None);
        assert_eq!(storage.chats_with_item("token").await.unwrap(), vec![ChatId(1)]);
    }
}
