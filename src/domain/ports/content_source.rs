//! Content source port.
//!
//! Abstraction over the remote content platform's REST surface. The HTTP
//! implementation lives in `infrastructure::content`; tests use in-memory
//! fakes.

use async_trait::async_trait;

use super::errors::ContentSourceError;
use crate::domain::models::{ContentCollection, ContentItem, ContentUpdate, WebsiteCredentials};

/// Port trait for reading and mutating remote content items.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch up to `limit` most recently published items from a collection.
    async fn fetch_recent(
        &self,
        credentials: &WebsiteCredentials,
        collection: ContentCollection,
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentSourceError>;

    /// Push a partial update to one item. The platform offers no
    /// transactional guarantees; a success here commits immediately.
    async fn update_item(
        &self,
        credentials: &WebsiteCredentials,
        collection: ContentCollection,
        id: u64,
        update: ContentUpdate,
    ) -> Result<(), ContentSourceError>;

    /// Pre-flight connectivity and credential check, run before apply-mode
    /// mutations are attempted.
    async fn check_connection(
        &self,
        credentials: &WebsiteCredentials,
    ) -> Result<(), ContentSourceError>;
}
