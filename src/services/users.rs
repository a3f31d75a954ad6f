//! Users API service.

use serde_json::Value;

use super::require_id;
use crate::client::{ApiInvoker, RequestExecutor};
use crate::error::HubstaffResult;
use crate::normalize::normalize_one;
use crate::types::RequestEnvelope;

/// Service for user lookups.
pub struct UsersService<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> UsersService<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// The user owning the refresh token.
    pub async fn me(&self) -> HubstaffResult<Value> {
        let raw = self.executor.invoke(RequestEnvelope::get("/users/me")).await?;
        Ok(normalize_one(raw, Some("user")))
    }

    pub async fn get(&self, user_id: &str) -> HubstaffResult<Value> {
        let user_id = require_id("user_id", user_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::get(format!("/users/{}", user_id)))
            .await?;
        Ok(normalize_one(raw, Some("user")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::{HubstaffError, ValidationError};
    use crate::services::test_support::{executor, path_of};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_me_unwraps_user() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"user": {"id": 1, "name": "Ana"}}));
        let executor = executor(transport.clone(), None);

        let user = UsersService::new(&executor).me().await.unwrap();

        assert_eq!(user, json!({"id": 1, "name": "Ana"}));
        assert_eq!(path_of(&transport.get_last_request().unwrap()), "/users/me");
    }

    #[tokio::test]
    async fn test_get_requires_id() {
        let transport = Arc::new(MockHttpTransport::new());
        let executor = executor(transport.clone(), None);

        let result = UsersService::new(&executor).get("").await;

        assert!(matches!(
            result,
            Err(HubstaffError::Validation(ValidationError::MissingField { .. }))
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
