//! Canned collaborators for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::GraphQlTransport;
use crate::error::{CommentsError, Result};

/// Answers every query with the same response and records what was sent.
pub struct CannedTransport {
    response: Option<serde_json::Value>,
    pub queries: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new(response: serde_json::Value) -> Self {
        Self {
            response: Some(response),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A transport whose every call fails like an unreachable endpoint.
    pub fn failing() -> Self {
        Self {
            response: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQlTransport for CannedTransport {
    async fn post_query(&self, query: &str) -> Result<serde_json::Value> {
        self.queries.lock().unwrap().push(query.to_string());
        self.response
            .clone()
            .ok_or_else(|| CommentsError::ApiError("connection refused".to_string()))
    }
}
