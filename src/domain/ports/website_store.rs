//! Website store port.
//!
//! Ownership lookups, stored credentials, and aggregate score persistence.
//! Owned by the wider application; the engine only consumes it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::StoreError;
use crate::domain::models::WebsiteCredentials;

/// Port trait for website ownership, credentials, and scoring.
#[async_trait]
pub trait WebsiteStore: Send + Sync {
    /// Owning user of a website, `None` if the website does not exist.
    async fn website_owner(&self, website_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Stored content platform credentials for a website.
    async fn credentials(&self, website_id: Uuid) -> Result<WebsiteCredentials, StoreError>;

    /// Most recently persisted aggregate SEO score, if any.
    async fn current_score(&self, website_id: Uuid) -> Result<Option<f64>, StoreError>;

    /// Persist a recomputed aggregate score. Must not trigger detection.
    async fn update_score(
        &self,
        website_id: Uuid,
        score: f64,
        last_analyzed: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
