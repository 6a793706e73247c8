//! Identity-only references to remote resources.

use crate::errors::{GitHubError, GitHubResult};
use crate::transport::{RawResponse, Transport};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Characters left unencoded in a caller-supplied path segment.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes one path segment (owner, repository or label name).
pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT_SET).to_string()
}

/// Serializes a request body.
pub(crate) fn to_json<B: Serialize + ?Sized>(body: &B) -> GitHubResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        GitHubError::invalid_parameter(format!("Failed to serialize request body: {}", e))
    })
}

/// A reference to one remote resource, identified by its API path.
///
/// A handle caches nothing. Every read is a fresh `GET` and every write is a
/// single round trip, so two handles with the same path are interchangeable.
#[derive(Clone)]
pub struct ResourceHandle {
    transport: Arc<dyn Transport>,
    path: String,
}

impl ResourceHandle {
    /// Creates a handle for `path`.
    pub fn new(transport: Arc<dyn Transport>, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
        }
    }

    /// Gets the resource path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Gets the transport the handle routes through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Derives a handle for a sub-resource. `suffix` must already be encoded.
    pub fn child(&self, suffix: &str) -> Self {
        Self::new(
            self.transport.clone(),
            format!("{}/{}", self.path, suffix.trim_start_matches('/')),
        )
    }

    /// Fetches a fresh snapshot of the resource.
    pub async fn fetch<S: DeserializeOwned>(&self) -> GitHubResult<S> {
        self.fetch_as("resource.fetch").await
    }

    /// Sends a partial update carrying exactly `fields`.
    ///
    /// An empty map is still sent; the service treats it as a no-op.
    pub async fn patch(&self, fields: Map<String, Value>) -> GitHubResult<()> {
        self.send("resource.patch", Method::PATCH, Some(Value::Object(fields)))
            .await
            .map(drop)
    }

    /// Deletes the resource.
    pub async fn delete(&self) -> GitHubResult<()> {
        self.send("resource.delete", Method::DELETE, None)
            .await
            .map(drop)
    }

    pub(crate) async fn fetch_as<S: DeserializeOwned>(&self, operation: &str) -> GitHubResult<S> {
        self.send(operation, Method::GET, None)
            .await?
            .decode()
            .map_err(|e| e.with_context(operation, self.path.clone()))
    }

    /// Sends `body` with `method` and decodes the response.
    pub(crate) async fn send_json<B, S>(
        &self,
        operation: &str,
        method: Method,
        body: &B,
    ) -> GitHubResult<S>
    where
        B: Serialize + ?Sized,
        S: DeserializeOwned,
    {
        let body = to_json(body).map_err(|e| e.with_context(operation, self.path.clone()))?;
        self.send(operation, method, Some(body))
            .await?
            .decode()
            .map_err(|e| e.with_context(operation, self.path.clone()))
    }

    pub(crate) async fn send(
        &self,
        operation: &str,
        method: Method,
        body: Option<Value>,
    ) -> GitHubResult<RawResponse> {
        self.transport
            .request(method, &self.path, body)
            .await
            .map_err(|e| e.with_context(operation, self.path.clone()))
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for ResourceHandle {}

impl Hash for ResourceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("path", &self.path)
            .finish()
    }
}
