//! SQLite implementation of the WebsiteStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::models::WebsiteCredentials;
use crate::domain::ports::{StoreError, WebsiteStore};

#[derive(Clone)]
pub struct SqliteWebsiteStore {
    pool: SqlitePool,
}

impl SqliteWebsiteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebsiteStore for SqliteWebsiteStore {
    async fn website_owner(&self, website_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT user_id FROM websites WHERE id = ?")
            .bind(website_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(user_id,)| Uuid::parse_str(&user_id))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn credentials(&self, website_id: Uuid) -> Result<WebsiteCredentials, StoreError> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT base_url, username, app_password FROM websites WHERE id = ?")
                .bind(website_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        let (base_url, username, app_password) =
            row.ok_or(StoreError::WebsiteNotFound(website_id))?;
        Ok(WebsiteCredentials {
            base_url,
            username,
            app_password,
        })
    }

    async fn current_score(&self, website_id: Uuid) -> Result<Option<f64>, StoreError> {
        let row: Option<(Option<f64>,)> =
            sqlx::query_as("SELECT seo_score FROM websites WHERE id = ?")
                .bind(website_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((score,)) => Ok(score),
            None => Err(StoreError::WebsiteNotFound(website_id)),
        }
    }

    async fn update_score(
        &self,
        website_id: Uuid,
        score: f64,
        last_analyzed: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE websites SET seo_score = ?, last_analyzed_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(score)
        .bind(last_analyzed.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(website_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::WebsiteNotFound(website_id));
        }
        Ok(())
    }
}
