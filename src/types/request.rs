//! Request Envelope
//!
//! One resource API call: method, path, optional JSON body and query.

use serde_json::Value;

use crate::core::{HttpMethod, QueryParams};

/// A single resource API request, relative to the API base URL.
#[derive(Clone, Debug)]
pub struct RequestEnvelope {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub query: QueryParams,
}

impl RequestEnvelope {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }
}
