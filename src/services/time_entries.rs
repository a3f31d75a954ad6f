//! Time entries API service.

use serde_json::{json, Value};

use super::{list, require_id, ListOptions};
use crate::client::{ApiInvoker, RequestExecutor};
use crate::core::QueryParams;
use crate::error::HubstaffResult;
use crate::normalize::normalize_one;
use crate::types::RequestEnvelope;

/// Date window for listing time entries.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryQuery {
    /// Sent as `start_date`.
    pub start_date: Option<String>,
    /// Sent as `end_date`.
    pub end_date: Option<String>,
}

impl TimeEntryQuery {
    pub fn between(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        let dates = [("start_date", &self.start_date), ("end_date", &self.end_date)];
        for (key, value) in dates {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                query.set(key, v);
            }
        }
        query
    }
}

/// Service for time entries.
pub struct TimeEntriesService<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> TimeEntriesService<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub async fn list(
        &self,
        window: &TimeEntryQuery,
        options: ListOptions,
    ) -> HubstaffResult<Vec<Value>> {
        list(
            self.executor,
            "/time_entries",
            window.to_query(),
            Some("time_entries"),
            options,
        )
        .await
    }

    /// Create a time entry. `entry` is sent as `{"time_entry": entry}`.
    pub async fn create(&self, entry: Value) -> HubstaffResult<Value> {
        let raw = self
            .executor
            .invoke(RequestEnvelope::post(
                "/time_entries",
                json!({ "time_entry": entry }),
            ))
            .await?;
        Ok(normalize_one(raw, None))
    }

    /// Patch a time entry. `fields` is sent as `{"time_entry": fields}`.
    pub async fn update(&self, time_entry_id: &str, fields: Value) -> HubstaffResult<Value> {
        let time_entry_id = require_id("time_entry_id", time_entry_id)?;
        let raw = self
            .executor
            .invoke(RequestEnvelope::patch(
                format!("/time_entries/{}", time_entry_id),
                json!({ "time_entry": fields }),
            ))
            .await?;
        Ok(normalize_one(raw, None))
    }
}
