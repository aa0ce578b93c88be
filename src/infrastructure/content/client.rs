//! HTTP client for the remote content platform.
//!
//! Authenticates with Basic auth (base64 of `username:app_password`) and
//! speaks the platform's REST surface: list published items per collection,
//! push partial updates per item. Non-2xx update responses surface the raw
//! response body as the error message.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client as ReqwestClient, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::models::{ContentCollection, ContentItem, ContentUpdate, WebsiteCredentials};
use crate::domain::ports::{ContentSource, ContentSourceError};
use async_trait::async_trait;

/// Items requested per collection listing; the platform caps pages at 50.
const PER_PAGE: usize = 50;

/// Configuration for the content platform client.
#[derive(Debug, Clone)]
pub struct ContentClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ContentClientConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// reqwest-backed implementation of the `ContentSource` port.
pub struct ContentClient {
    http: ReqwestClient,
}

impl ContentClient {
    pub fn new(config: ContentClientConfig) -> Result<Self, ContentSourceError> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| ContentSourceError::ConnectionFailed(e.to_string()))?;
        Ok(Self { http })
    }

    fn auth_header(credentials: &WebsiteCredentials) -> String {
        let token = BASE64.encode(format!(
            "{}:{}",
            credentials.username, credentials.app_password
        ));
        format!("Basic {token}")
    }

    fn list_url(credentials: &WebsiteCredentials, collection: ContentCollection) -> String {
        format!(
            "{}/api/content/{}?per_page={PER_PAGE}&status=published",
            credentials.base(),
            collection.as_str()
        )
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    #[instrument(skip(self, credentials), fields(collection = collection.as_str()))]
    async fn fetch_recent(
        &self,
        credentials: &WebsiteCredentials,
        collection: ContentCollection,
        limit: usize,
    ) -> Result<Vec<ContentItem>, ContentSourceError> {
        let response = self
            .http
            .get(Self::list_url(credentials, collection))
            .header("Authorization", Self::auth_header(credentials))
            .send()
            .await
            .map_err(|e| ContentSourceError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentSourceError::AuthRejected(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentSourceError::ConnectionFailed(format!(
                "{status}: {body}"
            )));
        }

        let mut items: Vec<ContentItem> = response
            .json()
            .await
            .map_err(|e| ContentSourceError::MalformedResponse(e.to_string()))?;
        for item in &mut items {
            item.collection = collection;
        }
        items.truncate(limit);
        debug!(count = items.len(), "fetched content items");
        Ok(items)
    }

    #[instrument(skip(self, credentials, update), fields(collection = collection.as_str(), id))]
    async fn update_item(
        &self,
        credentials: &WebsiteCredentials,
        collection: ContentCollection,
        id: u64,
        update: ContentUpdate,
    ) -> Result<(), ContentSourceError> {
        let url = format!(
            "{}/api/content/{}/{id}",
            credentials.base(),
            collection.as_str()
        );
        let response = self
            .http
            .post(url)
            .header("Authorization", Self::auth_header(credentials))
            .json(&update)
            .send()
            .await
            .map_err(|e| ContentSourceError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentSourceError::NotFound {
                collection: collection.as_str().to_string(),
                id,
            });
        }
        if !status.is_success() {
            // The platform puts the useful diagnostics in the body.
            let body = response.text().await.unwrap_or_default();
            return Err(ContentSourceError::UpdateRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn check_connection(
        &self,
        credentials: &WebsiteCredentials,
    ) -> Result<(), ContentSourceError> {
        let url = format!(
            "{}/api/content/posts?per_page=1&status=published",
            credentials.base()
        );
        let response = self
            .http
            .get(url)
            .header("Authorization", Self::auth_header(credentials))
            .send()
            .await
            .map_err(|e| ContentSourceError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ContentSourceError::AuthRejected(
                "credentials rejected by content platform".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ContentSourceError::ConnectionFailed(format!(
                "pre-flight check returned {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(base: &str) -> WebsiteCredentials {
        WebsiteCredentials {
            base_url: base.to_string(),
            username: "admin".to_string(),
            app_password: "secret".to_string(),
        }
    }

    #[test]
    fn auth_header_is_basic_base64() {
        let header = ContentClient::auth_header(&creds("https://example.com"));
        assert_eq!(header, format!("Basic {}", BASE64.encode("admin:secret")));
    }

    #[test]
    fn list_url_includes_paging_and_status() {
        let url = ContentClient::list_url(&creds("https://example.com/"), ContentCollection::Pages);
        assert_eq!(
            url,
            "https://example.com/api/content/pages?per_page=50&status=published"
        );
    }
}
