//! Projects API service.

use serde_json::{json, Map, Value};

use super::{list, require_id, ListOptions};
use crate::client::{ApiInvoker, RequestExecutor};
use crate::core::QueryParams;
use crate::error::{HubstaffResult, ValidationError};
use crate::normalize::{normalize, normalize_one, ResponseEnvelope};
use crate::types::RequestEnvelope;

/// Service for projects and project membership.
pub struct ProjectsService<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> ProjectsService<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Projects of the configured organization.
    pub async fn list(&self, options: ListOptions) -> HubstaffResult<Vec<Value>> {
        let organization_id = self.executor.organization_id("project.getAll")?;
        list(
            self.executor,
            &format!("/organizations/{}/projects", organization_id),
            QueryParams::new(),
            Some("projects"),
            options,
        )
        .await
    }

    pub async fn get(&self, project_id: &str) -> HubstaffResult<Value> {
        let project_id = require_id("project_id", project_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::get(format!("/projects/{}", project_id)))
            .await?;
        Ok(normalize_one(raw, Some("project")))
    }

    pub async fn members(&self, project_id: &str) -> HubstaffResult<Vec<Value>> {
        let project_id = require_id("project_id", project_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::get(format!("/projects/{}/members", project_id)))
            .await?;
        Ok(normalize(raw, Some("members")))
    }

    /// Create a project in the configured organization. `body` must carry a
    /// non-empty `name`.
    pub async fn create(&self, body: Value) -> HubstaffResult<Value> {
        let organization_id = self.executor.organization_id("project.create")?;
        let has_name = body
            .get("name")
            .and_then(Value::as_str)
            .is_some_and(|name| !name.trim().is_empty());
        if !has_name {
            return Err(ValidationError::MissingField {
                field: "name".to_string(),
            }
            .into());
        }

        let raw = self
            .executor
            .invoke(RequestEnvelope::post(
                format!("/organizations/{}/projects", organization_id),
                body,
            ))
            .await?;
        Ok(normalize_one(raw, Some("project")))
    }

    /// Update project fields and, separately, its member list.
    ///
    /// Returns `{"project": .., "membersUpdate": ..}` with whichever parts
    /// were sent, or `{"success": true}` when there was nothing to send.
    pub async fn update(
        &self,
        project_id: &str,
        fields: Map<String, Value>,
        members: Vec<Value>,
    ) -> HubstaffResult<Value> {
        let project_id = require_id("project_id", project_id)?;
        let mut result = Map::new();

        if !fields.is_empty() {
            let raw = self
                .executor
                .invoke(RequestEnvelope::put(
                    format!("/projects/{}", project_id),
                    Value::Object(fields),
                ))
                .await?;
            result.insert("project".to_string(), normalize_one(raw, Some("project")));
        }

        if !members.is_empty() {
            let raw = self
                .executor
                .invoke(RequestEnvelope::put(
                    format!("/projects/{}/update_members", project_id),
                    json!({ "members": members }),
                ))
                .await?;
            result.insert(
                "membersUpdate".to_string(),
                ResponseEnvelope::from(raw).resolve().into_value(),
            );
        }

        if result.is_empty() {
            return Ok(json!({ "success": true }));
        }
        Ok(Value::Object(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpMethod, MockHttpTransport};
    use crate::error::HubstaffError;
    use crate::services::test_support::{body_of, executor, path_of, query_of};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_unwraps_projects() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"projects": [{"id": 1}, {"id": 2}]}));
        let executor = executor(transport.clone(), Some("9"));

        let projects = ProjectsService::new(&executor)
            .list(ListOptions::limit(10))
            .await
            .unwrap();

        assert_eq!(projects, vec![json!({"id": 1}), json!({"id": 2})]);
        let request = transport.get_last_request().unwrap();
        assert_eq!(path_of(&request), "/organizations/9/projects");
        assert_eq!(query_of(&request), vec![("per_page".to_string(), "10".to_string())]);
    }

    #[tokio::test]
    async fn test_members_single_object() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"members": {"user_id": 4}}));
        let executor = executor(transport.clone(), None);

        let members = ProjectsService::new(&executor).members("12").await.unwrap();

        assert_eq!(members, vec![json!({"user_id": 4})]);
        assert_eq!(
            path_of(&transport.get_last_request().unwrap()),
            "/projects/12/members"
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let transport = Arc::new(MockHttpTransport::new());
        let executor = executor(transport.clone(), Some("9"));

        let result = ProjectsService::new(&executor)
            .create(json!({"description": "no name"}))
            .await;

        assert!(matches!(
            result,
            Err(HubstaffError::Validation(ValidationError::MissingField { ref field }))
                if field == "name"
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_posts_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(201, &json!({"project": {"id": 31, "name": "Apollo"}}));
        let executor = executor(transport.clone(), Some("9"));

        let project = ProjectsService::new(&executor)
            .create(json!({"name": "Apollo", "billable": true}))
            .await
            .unwrap();

        assert_eq!(project, json!({"id": 31, "name": "Apollo"}));
        let request = transport.get_last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(path_of(&request), "/organizations/9/projects");
        assert_eq!(body_of(&request), json!({"name": "Apollo", "billable": true}));
    }

    #[tokio::test]
    async fn test_update_fields_and_members() {
        let transport = Arc::new(MockHttpTransport::new());
        transport
            .queue_json_response(200, &json!({"project": {"id": 5, "name": "Renamed"}}))
            .queue_json_response(200, &json!({"members": [{"user_id": 8, "role": "user"}]}));
        let executor = executor(transport.clone(), None);

        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Renamed"));
        let result = ProjectsService::new(&executor)
            .update("5", fields, vec![json!({"user_id": 8, "role": "user"})])
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({
                "project": {"id": 5, "name": "Renamed"},
                "membersUpdate": {"members": [{"user_id": 8, "role": "user"}]}
            })
        );

        let requests = transport.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(path_of(&requests[0]), "/projects/5");
        assert_eq!(path_of(&requests[1]), "/projects/5/update_members");
        assert_eq!(
            body_of(&requests[1]),
            json!({"members": [{"user_id": 8, "role": "user"}]})
        );
    }

    #[tokio::test]
    async fn test_update_with_nothing_to_send() {
        let transport = Arc::new(MockHttpTransport::new());
        let executor = executor(transport.clone(), None);

        let result = ProjectsService::new(&executor)
            .update("5", Map::new(), Vec::new())
            .await
            .unwrap();

        assert_eq!(result, json!({"success": true}));
        assert_eq!(transport.request_count(), 0);
    }
}
