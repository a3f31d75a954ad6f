//! Tasks API service.

use serde_json::{json, Value};

use super::{list, require_id, ListOptions};
use crate::client::{ApiInvoker, RequestExecutor};
use crate::core::QueryParams;
use crate::error::{HubstaffResult, ValidationError};
use crate::normalize::{normalize_one, ResponseEnvelope};
use crate::params::parse_id_list;
use crate::types::RequestEnvelope;

/// Filters for task listing.
///
/// The ID-list filters accept a JSON array or a comma-separated string.
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub status: Vec<String>,
    pub user_ids: Value,
    pub project_ids: Value,
    pub global_todo_ids: Value,
    /// Cursor for `page_start_id` pagination.
    pub page_start_id: Option<String>,
    /// Sent as both `page_limit` and `per_page`.
    pub page_limit: Option<u32>,
}

impl TaskFilters {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();

        if let Some(start) = self.page_start_id.as_deref().filter(|s| !s.is_empty()) {
            query.set("page_start_id", start);
        }
        if let Some(limit) = self.page_limit.filter(|l| *l > 0) {
            query.set("page_limit", limit);
            query.set("per_page", limit);
        }
        if !self.status.is_empty() {
            query.set("status[]", self.status.clone());
        }

        let id_lists = [
            ("user_ids[]", &self.user_ids),
            ("project_ids[]", &self.project_ids),
            ("global_todo_ids[]", &self.global_todo_ids),
        ];
        for (key, input) in id_lists {
            let ids = parse_id_list(input);
            if !ids.is_empty() {
                query.set(key, ids);
            }
        }

        query
    }
}

/// Service for tasks.
pub struct TasksService<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> TasksService<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Tasks of one project, or of the configured organization when no
    /// project is given.
    pub async fn list(
        &self,
        project_id: Option<&str>,
        filters: &TaskFilters,
        options: ListOptions,
    ) -> HubstaffResult<Vec<Value>> {
        let project_id = project_id.map(str::trim).filter(|id| !id.is_empty());
        let path = match (project_id, self.executor.config().credentials.organization_id()) {
            (Some(project), _) => format!("/projects/{}/tasks", project),
            (None, Some(org)) => format!("/organizations/{}/tasks", org),
            (None, None) => return Err(ValidationError::MissingProjectOrOrganization.into()),
        };

        list(self.executor, &path, filters.to_query(), Some("tasks"), options).await
    }

    pub async fn get(&self, task_id: &str) -> HubstaffResult<Value> {
        let task_id = require_id("task_id", task_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::get(format!("/tasks/{}", task_id)))
            .await?;
        Ok(normalize_one(raw, Some("task")))
    }

    pub async fn create(&self, project_id: &str, summary: &str) -> HubstaffResult<Value> {
        let project_id = require_id("project_id", project_id)?;
        let summary = require_id("summary", summary)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::post(
                format!("/projects/{}/tasks", project_id),
                json!({ "summary": summary }),
            ))
            .await?;
        Ok(normalize_one(raw, Some("task")))
    }

    /// Update a task. `body` must carry the task's current `lock_version`.
    pub async fn update(&self, task_id: &str, body: Value) -> HubstaffResult<Value> {
        let task_id = require_id("task_id", task_id)?;
        if body.get("lock_version").map_or(true, Value::is_null) {
            return Err(ValidationError::MissingField {
                field: "lock_version".to_string(),
            }
            .into());
        }

        let raw = self
            .executor
            .invoke(RequestEnvelope::put(format!("/tasks/{}", task_id), body))
            .await?;
        Ok(normalize_one(raw, Some("task")))
    }

    /// Delete a task. An empty reply becomes a confirmation record.
    pub async fn delete(&self, task_id: &str) -> HubstaffResult<Value> {
        let task_id = require_id("task_id", task_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::delete(format!("/tasks/{}", task_id)))
            .await?;

        if ResponseEnvelope::from(raw.clone()).is_empty_body() {
            return Ok(json!({
                "success": true,
                "taskId": task_id,
                "message": "Task deleted",
            }));
        }
        Ok(normalize_one(raw, Some("task")))
    }
}
