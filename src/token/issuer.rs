//! Token Issuer
//!
//! Refresh-token grant against the endpoint advertised by OIDC discovery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::core::{DiscoveryClient, HttpMethod, HttpRequest, HttpTransport};
use crate::error::{DiscoveryError, HubstaffResult, TokenExchangeError};
use crate::token::TokenCache;
use crate::types::{TokenResponse, DEFAULT_EXPIRY_BUFFER};

/// Token issuer interface (for dependency injection).
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Exchange the refresh token for a new access token and cache it.
    async fn issue(&self, refresh_token: &SecretString) -> HubstaffResult<String>;
}

/// Discovery followed by a `refresh_token` grant.
///
/// Nothing is retried. The cache is written only after a successful exchange.
pub struct DefaultTokenIssuer {
    transport: Arc<dyn HttpTransport>,
    discovery: Arc<dyn DiscoveryClient>,
    discovery_url: String,
    cache: Arc<TokenCache>,
    expiry_buffer: Duration,
}

impl DefaultTokenIssuer {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        discovery: Arc<dyn DiscoveryClient>,
        discovery_url: impl Into<String>,
        cache: Arc<TokenCache>,
    ) -> Self {
        Self {
            transport,
            discovery,
            discovery_url: discovery_url.into(),
            cache,
            expiry_buffer: DEFAULT_EXPIRY_BUFFER,
        }
    }

    /// Override the safety margin subtracted from `expires_in`.
    pub fn with_expiry_buffer(mut self, buffer: Duration) -> Self {
        self.expiry_buffer = buffer;
        self
    }

    fn build_form(refresh_token: &SecretString) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token.expose_secret())
            .finish()
    }

    async fn exchange(
        &self,
        token_endpoint: &str,
        refresh_token: &SecretString,
    ) -> Result<TokenResponse, TokenExchangeError> {
        let request = HttpRequest::new(HttpMethod::Post, token_endpoint)
            .header("content-type", "application/x-www-form-urlencoded")
            .header("accept", "application/json")
            .body(Self::build_form(refresh_token));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| TokenExchangeError::Transport {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            warn!(
                status = response.status,
                token_endpoint = %token_endpoint,
                "Token exchange rejected"
            );
            return Err(TokenExchangeError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| TokenExchangeError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TokenIssuer for DefaultTokenIssuer {
    #[instrument(skip(self, refresh_token))]
    async fn issue(&self, refresh_token: &SecretString) -> HubstaffResult<String> {
        let document = self.discovery.fetch(&self.discovery_url).await?;
        let token_endpoint = document
            .token_endpoint
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or(DiscoveryError::MissingTokenEndpoint)?;
        debug!(token_endpoint = %token_endpoint, "Resolved token endpoint");

        let issued_at = Utc::now();
        let token = self.exchange(&token_endpoint, refresh_token).await?;

        let expires_at = expiry_from(issued_at, token.expires_in.unwrap_or(0), self.expiry_buffer);

        self.cache
            .put(refresh_token, token.access_token.clone(), expires_at);

        info!(
            expires_in = token.expires_in.unwrap_or(0),
            expires_at = %expires_at,
            "Issued access token"
        );

        Ok(token.access_token)
    }
}

/// `issued_at + expires_in - buffer`, clamped to the representable range.
fn expiry_from(issued_at: DateTime<Utc>, expires_in: i64, buffer: Duration) -> DateTime<Utc> {
    let buffer = i64::try_from(buffer.as_secs()).unwrap_or(i64::MAX);
    let lifetime = expires_in.saturating_sub(buffer);

    chrono::Duration::try_seconds(lifetime)
        .and_then(|delta| issued_at.checked_add_signed(delta))
        .unwrap_or(if lifetime > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

/// Mock issuer that hands out a fixed token and counts calls.
pub struct MockTokenIssuer {
    access_token: String,
    cache: Option<Arc<TokenCache>>,
    calls: AtomicUsize,
}

impl MockTokenIssuer {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            cache: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Also populate `cache` for one hour on each issuance.
    pub fn with_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue(&self, refresh_token: &SecretString) -> HubstaffResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(cache) = &self.cache {
            cache.put(
                refresh_token,
                self.access_token.clone(),
                Utc::now() + chrono::Duration::hours(1),
            );
        }
        Ok(self.access_token.clone())
    }
}
