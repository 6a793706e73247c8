//! Mock transport for testing code built on the client.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::transport::{error_from_response, RawResponse, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Transport answering from scripted responses.
///
/// Responses are keyed by method and path (query string excluded) and are
/// consumed in registration order.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Response store.
    responses: Arc<RwLock<HashMap<String, VecDeque<MockResponse>>>>,
    /// Request history.
    requests: Arc<RwLock<Vec<MockRequest>>>,
    /// Default behavior.
    default_behavior: DefaultBehavior,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Response body as JSON text.
    pub body: String,
    /// Headers.
    pub headers: HashMap<String, String>,
    /// Delay before responding.
    pub delay: Option<std::time::Duration>,
}

impl MockResponse {
    fn with_status<T: Serialize>(status: u16, body: &T) -> Self {
        Self {
            status,
            body: serde_json::to_string(body).unwrap_or_default(),
            headers: HashMap::new(),
            delay: None,
        }
    }

    /// Creates a successful response with the given body.
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::with_status(200, body)
    }

    /// Creates a 201 Created response.
    pub fn created<T: Serialize>(body: &T) -> Self {
        Self::with_status(201, body)
    }

    /// Creates a 204 No Content response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
            headers: HashMap::new(),
            delay: None,
        }
    }

    /// Creates a response whose body is not valid JSON.
    pub fn malformed(status: u16, text: &str) -> Self {
        Self {
            status,
            body: text.to_string(),
            headers: HashMap::new(),
            delay: None,
        }
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(message: &str) -> Self {
        Self::with_status(
            404,
            &serde_json::json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            }),
        )
    }

    /// Creates a 401 Unauthorized response.
    pub fn unauthorized(message: &str) -> Self {
        Self::with_status(
            401,
            &serde_json::json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            }),
        )
    }

    /// Creates a 422 Validation Failed response.
    pub fn validation_failed(message: &str, errors: Vec<(&str, &str, &str)>) -> Self {
        let errors: Vec<_> = errors
            .into_iter()
            .map(|(resource, field, code)| {
                serde_json::json!({
                    "resource": resource,
                    "field": field,
                    "code": code
                })
            })
            .collect();

        Self::with_status(
            422,
            &serde_json::json!({
                "message": message,
                "errors": errors,
                "documentation_url": "https://docs.github.com/rest"
            }),
        )
    }

    /// Creates a rate limit exceeded response.
    pub fn rate_limited() -> Self {
        let reset_at = Utc::now() + Duration::minutes(1);
        Self::with_status(
            403,
            &serde_json::json!({
                "message": "API rate limit exceeded",
                "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
            }),
        )
        .with_rate_limit(5000, 0, reset_at.timestamp())
        .with_header("retry-after", "60")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(message: &str) -> Self {
        Self::with_status(500, &serde_json::json!({ "message": message }))
    }

    /// Adds a delay to the response.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Adds a header to the response.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Adds rate limit headers.
    pub fn with_rate_limit(self, limit: u32, remaining: u32, reset_timestamp: i64) -> Self {
        self.with_header("x-ratelimit-limit", &limit.to_string())
            .with_header("x-ratelimit-remaining", &remaining.to_string())
            .with_header("x-ratelimit-reset", &reset_timestamp.to_string())
    }
}

/// A recorded mock request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// HTTP method.
    pub method: String,
    /// Request path, without origin or query string.
    pub path: String,
    /// Query string.
    pub query: Option<String>,
    /// Request body.
    pub body: Option<Value>,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Default behavior for unmatched requests.
#[derive(Debug, Clone, Copy, Default)]
pub enum DefaultBehavior {
    /// Return 404 for unmatched requests.
    #[default]
    NotFound,
    /// Return a transport error for unmatched requests.
    Error,
    /// Panic on unmatched requests.
    Panic,
}

/// Splits `https://host/path?query` or `/path?query` into path and query.
fn split_target(target: &str) -> (String, Option<String>) {
    let without_origin = match target.find("://") {
        Some(scheme_end) => {
            let rest = &target[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => target,
    };
    match without_origin.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (without_origin.to_string(), None),
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default behavior for unmatched requests.
    pub fn with_default_behavior(mut self, behavior: DefaultBehavior) -> Self {
        self.default_behavior = behavior;
        self
    }

    /// Registers a response for a given method and path.
    pub fn register(&self, method: &str, path: &str, response: MockResponse) {
        let key = format!("{}:{}", method.to_uppercase(), path);
        let mut store = self.responses.write().unwrap();
        store.entry(key).or_default().push_back(response);
    }

    /// Registers a GET response.
    pub fn on_get(&self, path: &str, response: MockResponse) {
        self.register("GET", path, response);
    }

    /// Registers a POST response.
    pub fn on_post(&self, path: &str, response: MockResponse) {
        self.register("POST", path, response);
    }

    /// Registers a PUT response.
    pub fn on_put(&self, path: &str, response: MockResponse) {
        self.register("PUT", path, response);
    }

    /// Registers a PATCH response.
    pub fn on_patch(&self, path: &str, response: MockResponse) {
        self.register("PATCH", path, response);
    }

    /// Registers a DELETE response.
    pub fn on_delete(&self, path: &str, response: MockResponse) {
        self.register("DELETE", path, response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Gets requests matching a method and path.
    pub fn requests_matching(&self, method: &str, path: &str) -> Vec<MockRequest> {
        self.requests
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .cloned()
            .collect()
    }

    /// Verifies that a specific request was made.
    pub fn verify_request(&self, method: &str, path: &str) -> bool {
        !self.requests_matching(method, path).is_empty()
    }

    /// Gets the count of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }

    /// Gets the number of scripted responses not yet consumed.
    pub fn pending_responses(&self) -> usize {
        self.responses.read().unwrap().values().map(VecDeque::len).sum()
    }

    fn unmatched(&self, method: &str, path: &str) -> GitHubError {
        let message = format!("No mock response for {} {}", method, path);
        match self.default_behavior {
            DefaultBehavior::NotFound => GitHubError::not_found(message),
            DefaultBehavior::Error => GitHubError::new(GitHubErrorKind::RequestFailed, message),
            DefaultBehavior::Panic => panic!("{}", message),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> GitHubResult<RawResponse> {
        let (path, query) = split_target(path);
        let method = method.as_str().to_string();

        self.requests.write().unwrap().push(MockRequest {
            method: method.clone(),
            path: path.clone(),
            query,
            body,
            timestamp: Utc::now(),
        });

        let key = format!("{}:{}", method, path);
        let response = self
            .responses
            .write()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        let Some(resp) = response else {
            return Err(self.unmatched(&method, &path));
        };

        if let Some(delay) = resp.delay {
            tokio::time::sleep(delay).await;
        }

        let parsed = if resp.body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&resp.body)
        };

        if (200..300).contains(&resp.status) {
            let body = parsed.map_err(|e| {
                GitHubError::deserialization(format!("Response body is not valid JSON: {}", e))
            })?;
            Ok(RawResponse {
                status: resp.status,
                headers: resp.headers,
                body,
            })
        } else {
            let payload = parsed.unwrap_or(Value::String(resp.body));
            Err(error_from_response(resp.status, &resp.headers, payload))
        }
    }
}

/// JSON fixtures shaped like GitHub REST responses.
pub mod fixtures {
    use serde_json::{json, Value};

    const CREATED_AT: &str = "2024-01-01T00:00:00Z";

    /// Creates a test user.
    pub fn user(login: &str) -> Value {
        json!({
            "id": 1,
            "login": login,
            "type": "User",
            "html_url": format!("https://github.com/{}", login)
        })
    }

    /// Creates a test user with a display name, as `GET /users/{login}` returns.
    pub fn full_user(login: &str, name: &str) -> Value {
        let mut user = user(login);
        user["name"] = json!(name);
        user
    }

    /// Creates a test repository.
    pub fn repository(owner: &str, name: &str) -> Value {
        json!({
            "id": 1,
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "owner": user(owner),
            "private": false,
            "description": "A test repository",
            "default_branch": "main",
            "open_issues_count": 5,
            "has_issues": true,
            "html_url": format!("https://github.com/{}/{}", owner, name)
        })
    }

    /// Creates a test issue.
    pub fn issue(number: u64, title: &str, body: &str, state: &str) -> Value {
        json!({
            "id": 1000 + number,
            "number": number,
            "title": title,
            "body": body,
            "state": state,
            "user": user("testuser"),
            "labels": [],
            "comments": 0,
            "html_url": format!("https://github.com/octocat/hello-world/issues/{}", number),
            "created_at": CREATED_AT,
            "updated_at": CREATED_AT,
            "closed_at": if state == "closed" { json!(CREATED_AT) } else { Value::Null }
        })
    }

    /// Creates a test issue that is really a pull request.
    pub fn pull_request_issue(number: u64, title: &str) -> Value {
        let mut issue = issue(number, title, "", "open");
        issue["pull_request"] = json!({
            "url": format!("https://api.github.com/repos/octocat/hello-world/pulls/{}", number)
        });
        issue
    }

    /// Creates a test comment.
    pub fn comment(id: u64, body: &str, login: &str) -> Value {
        json!({
            "id": id,
            "body": body,
            "user": user(login),
            "html_url": format!("https://github.com/octocat/hello-world/issues/1#issuecomment-{}", id),
            "created_at": CREATED_AT,
            "updated_at": CREATED_AT
        })
    }

    /// Creates a test label.
    pub fn label(name: &str, color: &str) -> Value {
        json!({
            "id": 1,
            "name": name,
            "color": color,
            "description": format!("The {} label", name),
            "default": false
        })
    }

    /// Creates a test issue event.
    pub fn event(id: u64, event: &str) -> Value {
        json!({
            "id": id,
            "event": event,
            "actor": user("testuser"),
            "commit_id": null,
            "created_at": CREATED_AT
        })
    }
}
