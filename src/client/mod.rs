//! Hubstaff client.

mod executor;

pub use executor::*;

use serde_json::Value;
use std::sync::Arc;

use crate::core::{DefaultDiscoveryClient, HttpTransport, QueryParams, ReqwestHttpTransport};
use crate::error::HubstaffResult;
use crate::normalize::normalize;
use crate::pagination::Paginator;
use crate::services::{
    MembersService, ProjectsService, TasksService, TimeEntriesService, UsersService,
};
use crate::token::{DefaultTokenIssuer, TokenCache, TokenIssuer, TokenManager};
use crate::types::{HubstaffConfig, RequestEnvelope};

/// Hubstaff v2 API client.
///
/// Clients built with the same `Arc<TokenCache>` share issued access tokens.
pub struct HubstaffClient {
    executor: RequestExecutor,
}

impl HubstaffClient {
    /// Create a client with a reqwest transport and a private token cache.
    pub fn new(config: HubstaffConfig) -> HubstaffResult<Self> {
        Self::with_cache(config, Arc::new(TokenCache::new()))
    }

    /// Create a client sharing an existing token cache.
    pub fn with_cache(config: HubstaffConfig, cache: Arc<TokenCache>) -> HubstaffResult<Self> {
        let transport = Arc::new(ReqwestHttpTransport::with_timeout(config.timeout)?);
        Ok(Self::with_transport(config, transport, cache))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        config: HubstaffConfig,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<TokenCache>,
    ) -> Self {
        let discovery = Arc::new(DefaultDiscoveryClient::new(transport.clone()));
        let issuer = DefaultTokenIssuer::new(
            transport.clone(),
            discovery,
            config.discovery_url.as_str(),
            cache.clone(),
        )
        .with_expiry_buffer(config.expiry_buffer);
        Self::with_issuer(config, transport, cache, Arc::new(issuer))
    }

    /// Create a client with a custom token issuer.
    pub fn with_issuer(
        config: HubstaffConfig,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<TokenCache>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        let tokens = TokenManager::new(cache, issuer);
        Self {
            executor: RequestExecutor::new(Arc::new(config), transport, tokens),
        }
    }

    pub fn config(&self) -> &HubstaffConfig {
        self.executor.config()
    }

    pub fn token_cache(&self) -> &Arc<TokenCache> {
        self.executor.tokens().cache()
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Run a raw request and return the decoded body as received.
    pub async fn invoke(&self, request: RequestEnvelope) -> HubstaffResult<Value> {
        self.executor.invoke(request).await
    }

    /// Run a request and flatten the response into records.
    pub async fn fetch(
        &self,
        request: RequestEnvelope,
        unwrap_key: Option<&str>,
    ) -> HubstaffResult<Vec<Value>> {
        let raw = self.executor.invoke(request).await?;
        Ok(normalize(raw, unwrap_key))
    }

    /// GET every page of `path` and concatenate the records.
    pub async fn fetch_all(
        &self,
        path: &str,
        base_query: &QueryParams,
    ) -> HubstaffResult<Vec<Value>> {
        Paginator::new(&self.executor)
            .with_default_per_page(self.config().default_per_page)
            .fetch_all(path, base_query)
            .await
    }

    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(&self.executor)
    }

    pub fn projects(&self) -> ProjectsService<'_> {
        ProjectsService::new(&self.executor)
    }

    pub fn time_entries(&self) -> TimeEntriesService<'_> {
        TimeEntriesService::new(&self.executor)
    }

    pub fn tasks(&self) -> TasksService<'_> {
        TasksService::new(&self.executor)
    }

    pub fn members(&self) -> MembersService<'_> {
        MembersService::new(&self.executor)
    }
}
