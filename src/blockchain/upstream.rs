// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the multichain aggregator.
//!
//! The rest of the crate only sees [`RpcTransport`]: a method name and JSON
//! params in, a JSON result (or a classified [`UpstreamError`]) out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

/// Default hard cap on a single upstream request.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of a non-JSON error body kept in [`UpstreamError::Http`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Request/response boundary to the upstream aggregator.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue one JSON-RPC call and return its `result` member.
    async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError>;
}

/// Errors that can occur while talking to the upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream {method} returned error {code}: {message}")]
    Api {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Upstream {method} returned malformed data: {reason}")]
    Decode { method: String, reason: String },

    #[error("Upstream {method} timed out")]
    Timeout { method: String },

    #[error("Upstream {method} request failed: {reason}")]
    Transport { method: String, reason: String },

    #[error("Upstream {method} returned HTTP {status}: {body}")]
    Http {
        method: String,
        status: u16,
        body: String,
    },

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    /// Whether repeating the same call could succeed.
    ///
    /// The core never retries; this is reported so callers can decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Timeout { .. } | UpstreamError::Transport { .. } => true,
            UpstreamError::Http { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Api { .. }
            | UpstreamError::Decode { .. }
            | UpstreamError::InvalidUrl(_) => false,
        }
    }

    /// The upstream method this error came from, if any.
    pub fn method(&self) -> Option<&str> {
        match self {
            UpstreamError::Api { method, .. }
            | UpstreamError::Decode { method, .. }
            | UpstreamError::Timeout { method }
            | UpstreamError::Transport { method, .. }
            | UpstreamError::Http { method, .. } => Some(method.as_str()),
            UpstreamError::InvalidUrl(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// reqwest-backed JSON-RPC 2.0 client.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    url: url::Url,
    http: Client,
}

impl JsonRpcClient {
    /// Create a client for `url` with a hard per-request `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let url: url::Url = url
            .parse()
            .map_err(|e: url::ParseError| UpstreamError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::InvalidUrl(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { url, http })
    }

    /// Host of the configured endpoint, for logging without leaking API keys
    /// embedded in the path.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

#[async_trait]
impl RpcTransport for JsonRpcClient {
    async fn call(&self, method: &str, params: Value) -> Result<Value, UpstreamError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        tracing::debug!(method, host = self.host(), "Calling upstream");

        let response = self
            .http
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(method, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(method, e))?;

        parse_envelope(method, status, &body)
    }
}

fn classify_reqwest_error(method: &str, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout {
            method: method.to_string(),
        }
    } else {
        UpstreamError::Transport {
            method: method.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Interpret a raw HTTP response body as a JSON-RPC envelope.
fn parse_envelope(method: &str, status: StatusCode, body: &str) -> Result<Value, UpstreamError> {
    let envelope: RpcEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(UpstreamError::Decode {
                method: method.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(UpstreamError::Http {
                method: method.to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            })
        }
    };

    if let Some(error) = envelope.error {
        if !error.message.is_empty() {
            return Err(UpstreamError::Api {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}

/// Decode a `result` value into a typed upstream shape.
pub fn decode_result<T: DeserializeOwned>(method: &str, result: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(result).map_err(|e| UpstreamError::Decode {
        method: method.to_string(),
        reason: e.to_string(),
    })
}
