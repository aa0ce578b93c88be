//! Remote content platform wire models.

use serde::{Deserialize, Serialize};

/// The two remote collections the engine scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCollection {
    Posts,
    Pages,
}

impl ContentCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Pages => "pages",
        }
    }

    pub fn both() -> [Self; 2] {
        [Self::Posts, Self::Pages]
    }
}

/// A content item as returned by the remote platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Rendered HTML body fragment
    #[serde(default)]
    pub content: String,
    /// Short summary, used as the meta description where supported
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(skip, default = "default_collection")]
    pub collection: ContentCollection,
}

fn default_collection() -> ContentCollection {
    ContentCollection::Posts
}

/// Partial update pushed back to the remote platform.
///
/// Only populated fields are sent; the platform merges them into the item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl ContentUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.excerpt.is_none()
    }
}

/// Credentials for the remote content platform (Basic auth).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteCredentials {
    pub base_url: String,
    pub username: String,
    /// Opaque application secret; never logged
    pub app_password: String,
}

impl WebsiteCredentials {
    /// Normalized base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
