//! Hubstaff Error Types
//!
//! Error hierarchy for token issuance, resource calls and input validation.

use std::time::Duration;
use thiserror::Error;

use crate::core::HttpMethod;

/// Result type used throughout the crate.
pub type HubstaffResult<T> = Result<T, HubstaffError>;

/// Root error type for the Hubstaff integration.
#[derive(Error, Debug)]
pub enum HubstaffError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Token exchange error: {0}")]
    TokenExchange(#[from] TokenExchangeError),

    #[error("Transport error on {method} {path}: {source}")]
    Transport {
        method: HttpMethod,
        path: String,
        #[source]
        source: TransportError,
    },

    #[error("{0}")]
    HttpStatus(#[from] HttpStatusError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl HubstaffError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "HUBSTAFF_CONFIG",
            Self::Auth(_) => "HUBSTAFF_AUTH",
            Self::Discovery(_) => "HUBSTAFF_DISCOVERY",
            Self::TokenExchange(_) => "HUBSTAFF_TOKEN_EXCHANGE",
            Self::Transport { .. } => "HUBSTAFF_TRANSPORT",
            Self::HttpStatus(_) => "HUBSTAFF_HTTP_STATUS",
            Self::Validation(_) => "HUBSTAFF_VALIDATION",
        }
    }

    /// Check if error is retryable.
    ///
    /// Purely advisory: nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            Self::Discovery(e) => e.is_retryable(),
            Self::TokenExchange(TokenExchangeError::Rejected { status, .. }) => *status >= 500,
            Self::TokenExchange(TokenExchangeError::Transport { .. }) => true,
            Self::HttpStatus(e) => e.status == 429 || e.status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenExchange(e) => e.status(),
            Self::HttpStatus(e) => Some(e.status),
            Self::Discovery(DiscoveryError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Check if the refresh token must be replaced before trying again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::TokenExchange(e) => e.oauth_error().as_deref() == Some("invalid_grant"),
            Self::HttpStatus(e) => e.status == 401,
            _ => false,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Missing environment variable: {name}")]
    MissingEnv { name: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Credential error.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No refresh token configured")]
    MissingRefreshToken,
}

/// Discovery document error.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Discovery document unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Discovery document request to {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid discovery document: {message}")]
    InvalidDocument { message: String },

    #[error("Discovery document has no token_endpoint")]
    MissingTokenEndpoint,
}

impl DiscoveryError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Refresh-token grant error.
#[derive(Error, Debug)]
pub enum TokenExchangeError {
    #[error("Token request failed: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid token response: {message}")]
    InvalidResponse { message: String },

    #[error("Token request failed: {message}")]
    Transport { message: String },
}

impl TokenExchangeError {
    /// HTTP status returned by the token endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body returned by the token endpoint.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The RFC 6749 `error` code from a rejected exchange, when the body carries one.
    pub fn oauth_error(&self) -> Option<String> {
        let body = self.body()?;
        parse_error_response(body).map(|r| r.error)
    }
}

/// Transport-level error, before any HTTP status is available.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to read response body: {message}")]
    BodyRead { message: String },
}

impl TransportError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::BodyRead { .. })
    }
}

/// Non-2xx response from the resource API.
#[derive(Error, Debug)]
#[error("Hubstaff API {method} {path} returned {status}: {body}")]
pub struct HttpStatusError {
    pub method: HttpMethod,
    pub path: String,
    pub status: u16,
    pub body: String,
}

/// Missing or malformed operation input, raised before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Organization ID is required for {operation}")]
    MissingOrganizationId { operation: String },

    #[error("Either a project ID or an organization ID is required")]
    MissingProjectOrOrganization,

    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

/// OAuth2 error response body.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
    pub error_uri: Option<String>,
}

/// Parse an OAuth2 error response body.
pub fn parse_error_response(body: &str) -> Option<OAuthErrorResponse> {
    serde_json::from_str(body).ok()
}
