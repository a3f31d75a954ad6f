//! Pagination handling for Hubstaff list endpoints.
//!
//! Page-number pagination. Endpoints that report `meta.pagination` stop on
//! `total_pages`; endpoints that do not are assumed exhausted on the first
//! empty or short page. The short-page rule is an approximation: a final
//! page holding exactly `per_page` items costs one extra, empty request.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiInvoker;
use crate::core::{QueryParams, QueryValue};
use crate::error::HubstaffResult;
use crate::normalize::{extract_data, ResponseEnvelope};
use crate::types::{RequestEnvelope, DEFAULT_PER_PAGE};

/// `meta.pagination` block of a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationMeta {
    /// Read `meta.pagination`, if the response carries one.
    pub fn from_response(response: &Value) -> Option<Self> {
        let pagination = response.get("meta")?.get("pagination")?.as_object()?;
        let field = |name: &str| pagination.get(name).and_then(Value::as_u64);
        Some(Self {
            total: field("total"),
            total_pages: field("total_pages"),
            per_page: field("per_page"),
        })
    }

    /// Explicit `total_pages` when non-zero, else `ceil(total / per_page)`,
    /// preferring the server's `per_page` over the requested one.
    pub fn page_count(&self, requested_per_page: u64) -> u64 {
        if let Some(pages) = self.total_pages.filter(|p| *p > 0) {
            return pages;
        }
        let per_page = self
            .per_page
            .filter(|p| *p > 0)
            .unwrap_or(requested_per_page)
            .max(1);
        self.total.unwrap_or(0).div_ceil(per_page)
    }
}

/// One fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: u64,
    pub items: Vec<Value>,
    pub meta: Option<PaginationMeta>,
}

impl Page {
    /// Whether no further page should be requested.
    pub fn is_last(&self, per_page: u64) -> bool {
        match &self.meta {
            Some(meta) => self.number >= meta.page_count(per_page),
            None => (self.items.len() as u64) < per_page,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Drives an [`ApiInvoker`] across pages of a GET endpoint.
pub struct Paginator<'a> {
    invoker: &'a dyn ApiInvoker,
    default_per_page: u64,
}

impl<'a> Paginator<'a> {
    pub fn new(invoker: &'a dyn ApiInvoker) -> Self {
        Self {
            invoker,
            default_per_page: DEFAULT_PER_PAGE as u64,
        }
    }

    /// Page size used when the base query carries no `per_page`.
    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page.max(1) as u64;
        self
    }

    fn per_page(&self, base_query: &QueryParams) -> u64 {
        base_query
            .get("per_page")
            .and_then(QueryValue::as_scalar)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(self.default_per_page)
    }

    /// Fetch a single page. Errors from the invoker are returned unchanged.
    pub async fn fetch_page(
        &self,
        path: &str,
        base_query: &QueryParams,
        number: u64,
    ) -> HubstaffResult<Page> {
        let mut query = base_query.clone();
        query.set("page", number);
        query.set("per_page", self.per_page(base_query));

        let raw = self
            .invoker
            .invoke(RequestEnvelope::get(path).with_query(query))
            .await?;
        let response = ResponseEnvelope::from(raw).resolve().into_value();

        Ok(Page {
            number,
            items: extract_data(&response),
            meta: PaginationMeta::from_response(&response),
        })
    }

    /// Fetch every page and concatenate the records in order.
    pub async fn fetch_all(
        &self,
        path: &str,
        base_query: &QueryParams,
    ) -> HubstaffResult<Vec<Value>> {
        let per_page = self.per_page(base_query);
        let mut records = Vec::new();
        let mut number = 1;

        loop {
            let page = self.fetch_page(path, base_query, number).await?;
            debug!(
                path = %path,
                page = number,
                items = page.len(),
                has_meta = page.meta.is_some(),
                "Fetched page"
            );

            if page.meta.is_none() && page.is_empty() {
                break;
            }

            let last = page.is_last(per_page);
            records.extend(page.items);
            if last {
                break;
            }
            number += 1;
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::services::test_support::executor;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Serves canned pages and records each request's query.
    struct ScriptedInvoker {
        pages: Mutex<Vec<Value>>,
        seen: Mutex<Vec<QueryParams>>,
    }

    impl ScriptedInvoker {
        fn new(pages: Vec<Value>) -> Self {
            Self {
                pages: Mutex::new(pages.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn pages_requested(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|q| q.get("page").and_then(QueryValue::as_scalar).unwrap().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl ApiInvoker for ScriptedInvoker {
        async fn invoke(&self, request: RequestEnvelope) -> HubstaffResult<Value> {
            self.seen.lock().unwrap().push(request.query);
            Ok(self.pages.lock().unwrap().pop().unwrap_or(json!([])))
        }
    }

    fn items(count: usize, offset: usize) -> Vec<Value> {
        (0..count).map(|i| json!({"id": offset + i})).collect()
    }

    #[tokio::test]
    async fn test_metadata_path_stops_at_total_pages() {
        let pages = (0..3)
            .map(|p| {
                json!({
                    "projects": items(2, p * 2),
                    "meta": {"pagination": {"total_pages": 3}}
                })
            })
            .collect();
        let invoker = ScriptedInvoker::new(pages);

        let records = Paginator::new(&invoker)
            .fetch_all("/organizations/1/projects", &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(records, items(6, 0));
        assert_eq!(invoker.pages_requested(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_metadata_total_without_total_pages() {
        let page = |offset| {
            json!({
                "data": items(10, offset),
                "meta": {"pagination": {"total": 25, "per_page": 10}}
            })
        };
        let invoker = ScriptedInvoker::new(vec![page(0), page(10), page(20)]);

        let records = Paginator::new(&invoker)
            .fetch_all("/time_entries", &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 30);
        assert_eq!(invoker.pages_requested().len(), 3);
    }

    #[tokio::test]
    async fn test_heuristic_path_stops_on_short_page() {
        let invoker = ScriptedInvoker::new(vec![
            Value::Array(items(100, 0)),
            Value::Array(items(100, 100)),
            Value::Array(items(37, 200)),
        ]);

        let records = Paginator::new(&invoker)
            .fetch_all("/organizations/1/members", &QueryParams::new())
            .await
            .unwrap();

        assert_eq!(records, items(237, 0));
        assert_eq!(invoker.pages_requested(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_heuristic_path_stops_on_empty_page() {
        let invoker = ScriptedInvoker::new(vec![
            json!({"members": items(5, 0)}),
            json!({"members": []}),
        ]);

        let records = Paginator::new(&invoker)
            .fetch_all("/organizations/1/members", &QueryParams::new().with("per_page", 5u32))
            .await
            .unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(invoker.pages_requested(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_empty_body_page_ends_pagination() {
        let transport = Arc::new(MockHttpTransport::new());
        transport
            .queue_json_response(200, &json!([{"id": 1}, {"id": 2}]))
            .queue_text_response(200, "");
        let executor = executor(transport.clone(), Some("1"));

        let records = Paginator::new(&executor)
            .fetch_all("/organizations/1/members", &QueryParams::new().with("per_page", 2u32))
            .await
            .unwrap();

        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_base_query_preserved_and_per_page_applied() {
        let invoker = ScriptedInvoker::new(vec![Value::Array(items(3, 0))]);
        let base = QueryParams::new()
            .with("status", vec!["active"])
            .with("per_page", 50u32);

        Paginator::new(&invoker)
            .fetch_all("/organizations/1/tasks", &base)
            .await
            .unwrap();

        let seen = invoker.seen.lock().unwrap();
        assert_eq!(
            seen[0].get("status"),
            Some(&QueryValue::List(vec!["active".to_string()]))
        );
        assert_eq!(seen[0].get("per_page").and_then(QueryValue::as_scalar), Some("50"));
    }

    #[test]
    fn test_page_count() {
        let meta = PaginationMeta {
            total: Some(201),
            total_pages: None,
            per_page: None,
        };
        assert_eq!(meta.page_count(100), 3);
        assert_eq!(
            PaginationMeta {
                total_pages: Some(0),
                ..meta
            }
            .page_count(100),
            3
        );
        assert_eq!(PaginationMeta::default().page_count(100), 0);
    }

    #[test]
    fn test_meta_from_response() {
        let response = json!({"meta": {"pagination": {"total": 12, "total_pages": 2}}});
        let meta = PaginationMeta::from_response(&response).unwrap();
        assert_eq!(meta.total, Some(12));
        assert_eq!(meta.total_pages, Some(2));
        assert!(PaginationMeta::from_response(&json!({"meta": {}})).is_none());
        assert!(PaginationMeta::from_response(&json!([1, 2])).is_none());
    }
}
