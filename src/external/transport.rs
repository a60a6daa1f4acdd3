//! Transport abstraction.
//!
//! Adapters describe what to send as a [`JsonRequest`]; a [`Transport`]
//! performs exactly one attempt. No retries happen at this layer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppResult;

/// HTTP method accepted by JSON-body providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A single JSON request to a provider endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: JsonValue,
    /// Per-request override of the client timeout
    pub timeout: Option<Duration>,
}

impl JsonRequest {
    pub fn post(url: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout: None,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Response of an accepted (2xx) request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Option<String>,
}

/// Sends provider requests.
///
/// Implementations must return `Err` for network failures and for non-2xx
/// responses, and must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: JsonRequest) -> AppResult<TransportResponse>;
}
