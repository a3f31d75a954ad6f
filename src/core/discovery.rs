//! OIDC Discovery
//!
//! Fetches the authorization server's well-known configuration document.
//! The document is fetched on every call; callers decide whether to cache.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::core::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::DiscoveryError;
use crate::types::DiscoveryDocument;

/// Discovery client interface (for dependency injection).
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Fetch and validate the discovery document at `url`.
    async fn fetch(&self, url: &str) -> Result<DiscoveryDocument, DiscoveryError>;
}

/// Default discovery client implementation.
pub struct DefaultDiscoveryClient {
    transport: Arc<dyn HttpTransport>,
}

impl DefaultDiscoveryClient {
    /// Create new discovery client.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DiscoveryClient for DefaultDiscoveryClient {
    async fn fetch(&self, url: &str) -> Result<DiscoveryDocument, DiscoveryError> {
        debug!(url = %url, "Fetching discovery document");

        let request = HttpRequest::new(HttpMethod::Get, url).header("accept", "application/json");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| DiscoveryError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(DiscoveryError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let document: DiscoveryDocument =
            serde_json::from_str(&response.body).map_err(|e| DiscoveryError::InvalidDocument {
                message: e.to_string(),
            })?;

        match document.token_endpoint.as_deref() {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(document),
            _ => Err(DiscoveryError::MissingTokenEndpoint),
        }
    }
}

/// Mock discovery client returning a fixed token endpoint.
pub struct MockDiscoveryClient {
    token_endpoint: String,
}

impl MockDiscoveryClient {
    pub fn new(token_endpoint: impl Into<String>) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
        }
    }
}

#[async_trait]
impl DiscoveryClient for MockDiscoveryClient {
    async fn fetch(&self, _url: &str) -> Result<DiscoveryDocument, DiscoveryError> {
        Ok(DiscoveryDocument::with_token_endpoint(&self.token_endpoint))
    }
}
