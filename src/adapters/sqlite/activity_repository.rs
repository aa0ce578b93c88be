//! SQLite implementation of the ActivityLog.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::ports::{ActivityKind, ActivityLog, StoreError};

#[derive(Clone)]
pub struct SqliteActivityLog {
    pool: SqlitePool,
}

impl SqliteActivityLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for SqliteActivityLog {
    async fn record(
        &self,
        user_id: Uuid,
        website_id: Uuid,
        kind: ActivityKind,
        description: &str,
        metadata: serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO activity_log (id, user_id, website_id, kind, description, metadata, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(website_id.to_string())
        .bind(kind.as_str())
        .bind(description)
        .bind(serde_json::to_string(&metadata)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
