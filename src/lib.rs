//! Hubstaff Integration Module
//!
//! Client for the Hubstaff v2 REST API with refresh-token authentication.
//!
//! # Features
//!
//! - OIDC discovery and `refresh_token` grant (RFC 6749 Section 6)
//! - Access-token cache shared across clients, with a five minute safety margin
//! - Response envelope normalization (`[...]`, `{"data": ..}`, `{"<resource>": ..}`)
//! - Page-number pagination with `meta.pagination` or short-page detection
//! - Users, projects, time entries, tasks and organization members
//! - Sequential batch execution with optional continue-on-fail
//!
//! # Example
//!
//! ```rust,ignore
//! use integrations_hubstaff::{HubstaffClient, HubstaffConfig, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HubstaffConfig::builder()
//!         .refresh_token(std::env::var("HUBSTAFF_REFRESH_TOKEN")?)
//!         .organization_id("12345")
//!         .build()?;
//!
//!     let client = HubstaffClient::new(config)?;
//!
//!     let me = client.users().me().await?;
//!     println!("Signed in as {}", me["name"]);
//!
//!     for project in client.projects().list(ListOptions::all()).await? {
//!         println!("{} {}", project["id"], project["name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, credentials and wire types
//! - `error`: error hierarchy
//! - `core`: HTTP transport, query encoding, OIDC discovery
//! - `token`: access-token cache, issuer and resolution
//! - `client`: request executor and high-level client
//! - `normalize`: response envelope flattening
//! - `pagination`: multi-page fetching
//! - `services`: per-resource operations
//! - `batch`: per-item execution
//! - `params`: tolerant input parsing
//! - `telemetry`: tracing subscriber setup

pub mod batch;
pub mod client;
pub mod core;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod params;
pub mod services;
pub mod telemetry;
pub mod token;
pub mod types;

pub use client::{ApiInvoker, HubstaffClient, RequestExecutor};

pub use error::{
    AuthError, ConfigurationError, DiscoveryError, HttpStatusError, HubstaffError,
    HubstaffResult, TokenExchangeError, TransportError, ValidationError,
};

pub use types::{Credentials, HubstaffConfig, HubstaffConfigBuilder, RequestEnvelope};

pub use crate::core::{
    DefaultDiscoveryClient, DiscoveryClient, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, MockHttpTransport, QueryParams, QueryValue, ReqwestHttpTransport,
};

pub use token::{
    CachedToken, DefaultTokenIssuer, MockTokenIssuer, TokenCache, TokenIssuer, TokenManager,
};

pub use normalize::{extract_data, normalize, normalize_one, ResponseEnvelope};
pub use pagination::{Page, PaginationMeta, Paginator};
pub use services::{
    ListOptions, MembersService, ProjectsService, TaskFilters, TasksService, TimeEntriesService,
    TimeEntryQuery, UsersService,
};
pub use batch::{BatchRunner, ItemResult};
pub use params::parse_id_list;
