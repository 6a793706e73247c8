//! Request/response transport beneath every resource operation.

mod http_transport;

pub use http_transport::HttpTransport;

use crate::errors::{GitHubError, GitHubResult, RateLimitInfo};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// A decoded response from the service.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code (always 2xx; failures surface as errors).
    pub status: u16,
    /// Response headers with lower-cased names.
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, `Value::Null` when the body was empty.
    pub body: Value,
}

impl RawResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Gets a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Decodes the body into a typed value.
    pub fn decode<T: DeserializeOwned>(self) -> GitHubResult<T> {
        decode_value(self.body)
    }
}

/// Decodes a JSON value, mapping shape mismatches to a decoding error.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> GitHubResult<T> {
    serde_json::from_value(value).map_err(|e| {
        GitHubError::deserialization(format!("Failed to deserialize response: {}", e))
    })
}

/// Issues one authenticated request per call.
///
/// `path` is either relative to the service root or an absolute URL on the
/// same origin (as found in pagination links). Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the decoded response or the failure.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> GitHubResult<RawResponse>;
}

/// Extracts rate limit headers.
pub fn extract_rate_limit(headers: &HashMap<String, String>) -> Option<RateLimitInfo> {
    let limit = headers.get("x-ratelimit-limit").and_then(|v| v.parse().ok())?;
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.parse().ok())?;
    let reset_timestamp: i64 = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.parse().ok())?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;
    let retry_after = headers.get("retry-after").and_then(|v| v.parse().ok());
    let resource = headers.get("x-ratelimit-resource").cloned();

    Some(RateLimitInfo {
        limit,
        remaining,
        reset_at,
        retry_after,
        resource,
    })
}

/// Builds the error for a non-2xx response.
pub fn error_from_response(
    status: u16,
    headers: &HashMap<String, String>,
    payload: Value,
) -> GitHubError {
    let rate_limit = extract_rate_limit(headers);

    if status == 403 || status == 429 {
        if let Some(ref info) = rate_limit {
            if info.remaining == 0 {
                return GitHubError::rate_limited(status, info.clone()).with_payload(payload);
            }
        }
    }

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {} error", status));
    let documentation_url = payload
        .get("documentation_url")
        .and_then(Value::as_str)
        .map(String::from);
    let request_id = headers.get("x-github-request-id").cloned();

    let mut error = GitHubError::from_response(status, message, documentation_url, request_id)
        .with_payload(payload);
    if let Some(info) = rate_limit {
        error = error.with_rate_limit(info);
    }
    error
}
