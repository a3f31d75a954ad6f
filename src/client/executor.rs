//! Request executor with authentication and status mapping.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::{HttpRequest, HttpTransport};
use crate::error::{HttpStatusError, HubstaffError, HubstaffResult, ValidationError};
use crate::token::TokenManager;
use crate::types::{HubstaffConfig, RequestEnvelope};

const USER_AGENT: &str = concat!("integrations-hubstaff/", env!("CARGO_PKG_VERSION"));

/// Anything that can run a [`RequestEnvelope`] and return the decoded body.
#[async_trait]
pub trait ApiInvoker: Send + Sync {
    async fn invoke(&self, request: RequestEnvelope) -> HubstaffResult<Value>;
}

/// Executes resource API requests.
///
/// Each call resolves an access token through the [`TokenManager`], sends the
/// request and maps non-2xx responses to [`HttpStatusError`]. Response bodies
/// are returned as received: JSON when they parse, otherwise a JSON string
/// (empty for an empty body).
pub struct RequestExecutor {
    config: Arc<HubstaffConfig>,
    transport: Arc<dyn HttpTransport>,
    tokens: TokenManager,
}

impl RequestExecutor {
    pub fn new(
        config: Arc<HubstaffConfig>,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenManager,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    pub fn config(&self) -> &HubstaffConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// The configured organization ID, or a validation error naming `operation`.
    pub fn organization_id(&self, operation: &str) -> HubstaffResult<String> {
        self.config
            .credentials
            .organization_id()
            .map(str::to_string)
            .ok_or_else(|| {
                ValidationError::MissingOrganizationId {
                    operation: operation.to_string(),
                }
                .into()
            })
    }

    fn build_url(&self, request: &RequestEnvelope) -> HubstaffResult<String> {
        let mut url = self.config.resource_url(&request.path)?;
        request.query.apply_to(&mut url);
        Ok(url.into())
    }

    fn decode_body(body: &str) -> Value {
        if body.trim().is_empty() {
            return Value::String(String::new());
        }
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    }
}

#[async_trait]
impl ApiInvoker for RequestExecutor {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn invoke(&self, request: RequestEnvelope) -> HubstaffResult<Value> {
        let token = self
            .tokens
            .access_token(&self.config.credentials.refresh_token)
            .await?;

        let url = self.build_url(&request)?;

        let mut http_request = HttpRequest::new(request.method, url)
            .header("authorization", format!("Bearer {}", token))
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .header("user-agent", USER_AGENT);
        http_request.timeout = Some(self.config.timeout);

        if let Some(body) = &request.body {
            let encoded = serde_json::to_string(body).map_err(|e| ValidationError::InvalidBody {
                message: e.to_string(),
            })?;
            http_request = http_request.body(encoded);
        }

        debug!(query_params = request.query.len(), "Sending Hubstaff request");

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|source| HubstaffError::Transport {
                method: request.method,
                path: request.path.clone(),
                source,
            })?;

        if !response.is_success() {
            warn!(status = response.status, "Hubstaff request failed");
            return Err(HttpStatusError {
                method: request.method,
                path: request.path,
                status: response.status,
                body: response.body,
            }
            .into());
        }

        debug!(status = response.status, "Hubstaff request succeeded");
        Ok(Self::decode_body(&response.body))
    }
}
