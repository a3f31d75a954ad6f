//! Token Types
//!
//! Wire types for the discovery document and the token endpoint reply.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// OIDC discovery document. Only `token_endpoint` is required downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub authorization_endpoint: Option<String>,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
    #[serde(default)]
    pub jwks_uri: Option<String>,
    #[serde(default)]
    pub scopes_supported: Vec<String>,
    #[serde(default)]
    pub grant_types_supported: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DiscoveryDocument {
    pub fn with_token_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            token_endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }
}

/// Token endpoint success response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds. A missing value is treated as zero.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
