//! Token Manager
//!
//! Resolves a usable access token for a refresh token: sweep, cache lookup,
//! then issuance on a miss.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, HubstaffResult};
use crate::token::{TokenCache, TokenIssuer};

/// Cache-first access token resolution.
///
/// Concurrent misses for the same refresh token may both reach the issuer;
/// the later write wins.
pub struct TokenManager {
    cache: Arc<TokenCache>,
    issuer: Arc<dyn TokenIssuer>,
}

impl TokenManager {
    pub fn new(cache: Arc<TokenCache>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self { cache, issuer }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Get a fresh access token, issuing a new one when none is cached.
    pub async fn access_token(&self, refresh_token: &SecretString) -> HubstaffResult<String> {
        if refresh_token.expose_secret().trim().is_empty() {
            return Err(AuthError::MissingRefreshToken.into());
        }

        let swept = self.cache.sweep();
        if swept > 0 {
            debug!(swept, "Swept expired access tokens");
        }

        if let Some(cached) = self.cache.get(refresh_token) {
            debug!(expires_at = %cached.expires_at, "Using cached access token");
            return Ok(cached.access_token.expose_secret().clone());
        }

        debug!("No cached access token, issuing");
        self.issuer.issue(refresh_token).await
    }
}
