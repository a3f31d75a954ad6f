//! Configuration
//!
//! Client configuration, credential holder and environment loading.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::ConfigurationError;

/// Hubstaff v2 API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.hubstaff.com/v2";

/// Hubstaff OIDC discovery document.
pub const DEFAULT_DISCOVERY_URL: &str =
    "https://account.hubstaff.com/.well-known/openid-configuration";

/// Default page size for paginated listing.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Safety margin subtracted from the server-reported token lifetime.
pub const DEFAULT_EXPIRY_BUFFER: Duration = Duration::from_secs(300);

pub const ENV_REFRESH_TOKEN: &str = "HUBSTAFF_REFRESH_TOKEN";
pub const ENV_ORGANIZATION_ID: &str = "HUBSTAFF_ORGANIZATION_ID";
pub const ENV_API_BASE_URL: &str = "HUBSTAFF_API_BASE_URL";
pub const ENV_DISCOVERY_URL: &str = "HUBSTAFF_DISCOVERY_URL";

/// Caller-owned credential: a personal refresh token plus an optional
/// organization scope.
#[derive(Clone)]
pub struct Credentials {
    pub refresh_token: SecretString,
    pub organization_id: Option<String>,
}

impl Credentials {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: SecretString::new(refresh_token.into()),
            organization_id: None,
        }
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Whether the refresh token is non-blank.
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.expose_secret().trim().is_empty()
    }

    /// Organization ID, ignoring blank values.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("refresh_token", &"[REDACTED]")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Hubstaff client configuration.
#[derive(Clone, Debug)]
pub struct HubstaffConfig {
    /// Credential used for every request.
    pub credentials: Credentials,
    /// Resource API base, e.g. `https://api.hubstaff.com/v2`.
    pub api_base_url: Url,
    /// Well-known OIDC discovery document.
    pub discovery_url: Url,
    /// Transport timeout.
    pub timeout: Duration,
    /// Page size used by the paginator when the query carries none.
    pub default_per_page: u32,
    /// Subtracted from `expires_in` when caching access tokens.
    pub expiry_buffer: Duration,
}

impl HubstaffConfig {
    /// Create a configuration builder.
    pub fn builder() -> HubstaffConfigBuilder {
        HubstaffConfigBuilder::new()
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let refresh_token =
            lookup(ENV_REFRESH_TOKEN).ok_or_else(|| ConfigurationError::MissingEnv {
                name: ENV_REFRESH_TOKEN.to_string(),
            })?;

        let mut builder = Self::builder().refresh_token(refresh_token);

        if let Some(org) = lookup(ENV_ORGANIZATION_ID) {
            builder = builder.organization_id(org);
        }
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(url) = lookup(ENV_DISCOVERY_URL) {
            builder = builder.discovery_url(url);
        }

        builder.build()
    }

    /// Join a resource path onto the API base URL.
    pub fn resource_url(&self, path: &str) -> Result<Url, ConfigurationError> {
        let base = self.api_base_url.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };
        Url::parse(&joined).map_err(|e| ConfigurationError::InvalidUrl {
            url: joined.clone(),
            message: e.to_string(),
        })
    }
}

/// Hubstaff configuration builder.
pub struct HubstaffConfigBuilder {
    refresh_token: Option<String>,
    organization_id: Option<String>,
    api_base_url: String,
    discovery_url: String,
    timeout: Duration,
    default_per_page: u32,
    expiry_buffer: Duration,
}

impl Default for HubstaffConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HubstaffConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            refresh_token: None,
            organization_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            timeout: Duration::from_secs(30),
            default_per_page: DEFAULT_PER_PAGE,
            expiry_buffer: DEFAULT_EXPIRY_BUFFER,
        }
    }

    /// Set the refresh token.
    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set the organization ID.
    pub fn organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.refresh_token = Some(credentials.refresh_token.expose_secret().clone());
        self.organization_id = credentials.organization_id;
        self
    }

    /// Override the API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the discovery document URL.
    pub fn discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    /// Set transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the paginator's default page size.
    pub fn default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    /// Set the token expiry safety buffer.
    pub fn expiry_buffer(mut self, buffer: Duration) -> Self {
        self.expiry_buffer = buffer;
        self
    }

    /// Build the configuration.
    ///
    /// A missing refresh token is not rejected here; requests fail with
    /// an authentication error instead.
    pub fn build(self) -> Result<HubstaffConfig, ConfigurationError> {
        let api_base_url = parse_url(&self.api_base_url)?;
        let discovery_url = parse_url(&self.discovery_url)?;

        if self.default_per_page == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "default_per_page".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let mut credentials = Credentials::new(self.refresh_token.unwrap_or_default());
        credentials.organization_id = self.organization_id;

        Ok(HubstaffConfig {
            credentials,
            api_base_url,
            discovery_url,
            timeout: self.timeout,
            default_per_page: self.default_per_page,
            expiry_buffer: self.expiry_buffer,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(raw).map_err(|e| ConfigurationError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigurationError::InvalidUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme {}", other),
        }),
    }
}
