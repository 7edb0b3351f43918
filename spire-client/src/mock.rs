//! In-memory HTTP client for tests
//!
//! `MockHttpClient` implements [`HttpClient`] without touching the network.
//! Every call is recorded, and responses are served from a queue in the order
//! they were pushed. An empty queue answers with `null`.
//!
//! ```
//! use spire_client::mock::{Method, MockHttpClient};
//! use spire_client::{Order, OrderId};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), spire_client::SpireError> {
//! let client = MockHttpClient::new();
//! client.respond_with(json!({"id": 42, "orderNo": "00042"}));
//!
//! let order = Order::find(&client, OrderId(42)).await?;
//! assert_eq!(order.attributes().order_no.as_deref(), Some("00042"));
//! assert_eq!(client.requests()[0].method, Method::Get);
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SpireError, SpireResult};
use crate::http::HttpClient;

/// HTTP verb of a recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Recording HTTP client with scripted responses
#[derive(Debug, Default)]
pub struct MockHttpClient {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<SpireResult<Value>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body
    pub fn respond_with(&self, body: Value) -> &Self {
        lock(&self.responses).push_back(Ok(body));
        self
    }

    /// Queue a failure
    pub fn fail_with(&self, error: SpireError) -> &Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    fn record(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> SpireResult<Value> {
        lock(&self.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.cloned(),
        });
        lock(&self.responses).pop_front().unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> SpireResult<Value> {
        self.record(Method::Get, path, query, None)
    }

    async fn post(&self, path: &str, body: &Value) -> SpireResult<Value> {
        self.record(Method::Post, path, &[], Some(body))
    }

    async fn put(&self, path: &str, body: &Value) -> SpireResult<Value> {
        self.record(Method::Put, path, &[], Some(body))
    }

    async fn delete(&self, path: &str) -> SpireResult<Value> {
        self.record(Method::Delete, path, &[], None)
    }
}
