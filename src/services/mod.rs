//! Hubstaff API service implementations.

mod members;
mod projects;
mod tasks;
mod time_entries;
mod users;

pub use members::*;
pub use projects::*;
pub use tasks::*;
pub use time_entries::*;
pub use users::*;

use serde_json::Value;

use crate::client::{ApiInvoker, RequestExecutor};
use crate::core::QueryParams;
use crate::error::{HubstaffResult, ValidationError};
use crate::normalize::normalize;
use crate::pagination::Paginator;
use crate::types::RequestEnvelope;

/// Default page size for a single-page listing.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// How much of a collection to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Follow pagination to the end.
    pub return_all: bool,
    /// `per_page` for a single-page request. Ignored when `return_all` is set.
    pub limit: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListOptions {
    pub fn all() -> Self {
        Self {
            return_all: true,
            ..Self::default()
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            return_all: false,
            limit,
        }
    }
}

/// Run a list request: every page through the paginator, or one page of `limit`.
async fn list(
    executor: &RequestExecutor,
    path: &str,
    mut query: QueryParams,
    unwrap_key: Option<&str>,
    options: ListOptions,
) -> HubstaffResult<Vec<Value>> {
    if options.return_all {
        let records = Paginator::new(executor)
            .with_default_per_page(executor.config().default_per_page)
            .fetch_all(path, &query)
            .await?;
        return Ok(normalize(Value::Array(records), unwrap_key));
    }

    query.set("per_page", options.limit);
    let raw = executor
        .invoke(RequestEnvelope::get(path).with_query(query))
        .await?;
    Ok(normalize(raw, unwrap_key))
}

/// Trimmed, non-empty path identifier.
fn require_id<'a>(field: &str, value: &'a str) -> HubstaffResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        }
        .into());
    }
    Ok(trimmed)
}
