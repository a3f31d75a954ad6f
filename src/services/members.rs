//! Organization members API service.

use serde_json::Value;

use super::{list, ListOptions};
use crate::client::RequestExecutor;
use crate::core::QueryParams;
use crate::error::HubstaffResult;

/// Service for organization membership.
pub struct MembersService<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> MembersService<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Members of the configured organization.
    pub async fn list(&self, options: ListOptions) -> HubstaffResult<Vec<Value>> {
        let organization_id = self.executor.organization_id("member.getAll")?;
        list(
            self.executor,
            &format!("/organizations/{}/members", organization_id),
            QueryParams::new(),
            Some("members"),
            options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::{HubstaffError, ValidationError};
    use crate::services::test_support::{executor, path_of, query_of};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_single_page() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"members": [{"user_id": 1}, {"user_id": 2}]}),
        );
        let executor = executor(transport.clone(), Some("55"));

        let members = MembersService::new(&executor)
            .list(ListOptions::limit(2))
            .await
            .unwrap();

        assert_eq!(members, vec![json!({"user_id": 1}), json!({"user_id": 2})]);
        let request = transport.get_last_request().unwrap();
        assert_eq!(path_of(&request), "/organizations/55/members");
        assert_eq!(query_of(&request), vec![("per_page".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_list_all_follows_pages() {
        let transport = Arc::new(MockHttpTransport::new());
        let full: Vec<_> = (0..100).map(|i| json!({"user_id": i})).collect();
        transport
            .queue_json_response(200, &json!({"members": full}))
            .queue_json_response(200, &json!({"members": [{"user_id": 100}]}));
        let executor = executor(transport.clone(), Some("55"));

        let members = MembersService::new(&executor)
            .list(ListOptions::all())
            .await
            .unwrap();

        assert_eq!(members.len(), 101);
        assert_eq!(transport.request_count(), 2);
        assert!(query_of(&transport.get_requests()[1])
            .contains(&("page".to_string(), "2".to_string())));
    }

    #[tokio::test]
    async fn test_list_requires_organization() {
        let transport = Arc::new(MockHttpTransport::new());
        let executor = executor(transport.clone(), None);

        let result = MembersService::new(&executor).list(ListOptions::default()).await;

        assert!(matches!(
            result,
            Err(HubstaffError::Validation(ValidationError::MissingOrganizationId { .. }))
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
