use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct StorageEntry {
    pub chat_id: i64,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
