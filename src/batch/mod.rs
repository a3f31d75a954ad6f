//! Batch Execution
//!
//! Runs one operation per input item, strictly in order.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::future::Future;
use tracing::warn;

use crate::error::HubstaffResult;

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemResult {
    /// Records produced by the item.
    Success(Vec<Value>),
    /// Failure marker kept in place of the item's output.
    Failed { error: String, json: Value },
}

impl ItemResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            json: Value::Object(Map::new()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Sequential batch runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchRunner {
    continue_on_fail: bool,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record failures as [`ItemResult::Failed`] instead of aborting.
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    /// Run `op` for each item. Without `continue_on_fail` the first error is
    /// returned and the remaining items are not run.
    pub async fn run<T, F, Fut>(&self, items: Vec<T>, mut op: F) -> HubstaffResult<Vec<ItemResult>>
    where
        F: FnMut(usize, T) -> Fut,
        Fut: Future<Output = HubstaffResult<Vec<Value>>>,
    {
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            match op(index, item).await {
                Ok(records) => results.push(ItemResult::Success(records)),
                Err(e) if self.continue_on_fail => {
                    warn!(index, error_code = e.error_code(), error = %e, "Batch item failed");
                    results.push(ItemResult::failed(e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }
}

/// Flatten results into output records: each success record as-is, each
/// failure as `{"error": .., "json": {}}`.
pub fn flatten(results: Vec<ItemResult>) -> Vec<Value> {
    let mut output = Vec::new();
    for result in results {
        match result {
            ItemResult::Success(records) => output.extend(records),
            ItemResult::Failed { error, json } => {
                output.push(json!({ "error": error, "json": json }))
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HubstaffError, ValidationError};

    fn fail_on_two(
        _index: usize,
        item: u32,
    ) -> impl Future<Output = HubstaffResult<Vec<Value>>> {
        async move {
            if item == 2 {
                Err(HubstaffError::Validation(ValidationError::MissingField {
                    field: "task_id".to_string(),
                }))
            } else {
                Ok(vec![json!({ "item": item })])
            }
        }
    }

    #[tokio::test]
    async fn test_continue_on_fail_keeps_going() {
        let results = BatchRunner::new()
            .continue_on_fail(true)
            .run(vec![1, 2, 3], fail_on_two)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], ItemResult::Success(vec![json!({"item": 1})]));
        assert_eq!(
            results[1],
            ItemResult::failed("Validation error: Missing required field: task_id")
        );
        assert_eq!(results[2], ItemResult::Success(vec![json!({"item": 3})]));

        assert_eq!(
            flatten(results),
            vec![
                json!({"item": 1}),
                json!({"error": "Validation error: Missing required field: task_id", "json": {}}),
                json!({"item": 3}),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_error_aborts() {
        let mut seen = Vec::new();
        let result = BatchRunner::new()
            .run(vec![1, 2, 3], |index, item| {
                seen.push(index);
                fail_on_two(index, item)
            })
            .await;

        assert!(matches!(result, Err(HubstaffError::Validation(_))));
        assert_eq!(seen, vec![0, 1]);
    }
}
