//! Boundary to the HTTP client collaborator.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::{Headers, HttpMethod};

/// Transport-level failures. The executor turns every one of these into an
/// `Error` outcome; they never reach the reporting layer as errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Dispatch timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Dispatch aborted: {0}")]
    Aborted(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request handed to the dispatcher: plain data only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Headers,
    pub query: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Response returned by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl DispatchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: Headers::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Sends one request to the service under test.
///
/// Implementations own connection handling and cancellation; an aborted
/// request should come back as `DispatchError::Aborted`.
#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse, DispatchError>;
}
