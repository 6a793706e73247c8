//! reqwest-backed transport.

use super::{error_from_response, extract_rate_limit, RawResponse, Transport};
use crate::auth::AuthManager;
use crate::config::GitHubConfig;
use crate::errors::{is_rate_limit_error, GitHubError, GitHubErrorKind, GitHubResult};
use crate::observability::{Metrics, RequestTimer, TracingHooks};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Transport that talks HTTPS to the GitHub REST API.
pub struct HttpTransport {
    /// HTTP client.
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Authentication manager.
    auth: AuthManager,
    /// User-Agent header.
    user_agent: String,
    /// API version header.
    api_version: String,
    /// Request metrics.
    metrics: Arc<Metrics>,
}

impl HttpTransport {
    /// Creates a transport from configuration. Authentication is required.
    pub fn new(config: &GitHubConfig) -> GitHubResult<Self> {
        config.validate()?;

        let auth = AuthManager::new(config.auth.clone().ok_or_else(|| {
            GitHubError::new(GitHubErrorKind::MissingAuth, "Authentication required")
        })?)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                GitHubError::new(
                    GitHubErrorKind::InvalidConfiguration,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            user_agent: config.user_agent.clone(),
            api_version: config.api_version.clone(),
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Gets the request metrics.
    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    fn resolve_url(&self, path: &str) -> GitHubResult<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            // Absolute links (pagination) must stay on the configured origin.
            let same_origin = path == self.base_url
                || path.starts_with(&format!("{}/", self.base_url))
                || path.starts_with(&format!("{}?", self.base_url));
            if !same_origin {
                return Err(GitHubError::invalid_parameter(format!(
                    "Refusing to follow link outside {}: {}",
                    self.base_url, path
                )));
            }
            return Ok(path.to_string());
        }
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    fn map_send_error(e: reqwest::Error) -> GitHubError {
        if e.is_timeout() {
            GitHubError::timeout(format!("Request timed out: {}", e)).with_cause(e)
        } else if e.is_connect() {
            GitHubError::new(
                GitHubErrorKind::ConnectionFailed,
                format!("Connection failed: {}", e),
            )
            .with_cause(e)
        } else {
            GitHubError::new(GitHubErrorKind::RequestFailed, format!("Request failed: {}", e))
                .with_cause(e)
        }
    }

    fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect()
    }

    fn parse_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(bytes)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> GitHubResult<RawResponse> {
        let url = self.resolve_url(path)?;
        let method_name = method.as_str().to_string();
        TracingHooks::on_request_start(&method_name, &url);
        let timer = RequestTimer::new(self.metrics.clone());

        let auth_header = self.auth.auth_header();
        TracingHooks::on_request_headers(
            &method_name,
            &url,
            &[
                ("authorization", auth_header.as_str()),
                ("user-agent", self.user_agent.as_str()),
                ("accept", GITHUB_JSON),
                ("x-github-api-version", self.api_version.as_str()),
            ],
        );

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, auth_header)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, GITHUB_JSON)
            .header("X-GitHub-Api-Version", &self.api_version);

        if let Some(ref body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                timer.failure();
                let error = Self::map_send_error(e);
                TracingHooks::on_request_error(&method_name, &url, &error.to_string());
                return Err(error);
            }
        };

        let status = response.status().as_u16();
        let headers = Self::collect_headers(response.headers());
        TracingHooks::on_response_headers(&method_name, &url, &headers);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                timer.failure();
                let error = Self::map_send_error(e);
                TracingHooks::on_request_error(&method_name, &url, &error.to_string());
                return Err(error);
            }
        };

        if !(200..300).contains(&status) {
            let elapsed = timer.failure();
            let payload = Self::parse_body(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });
            let error = error_from_response(status, &headers, payload);
            if is_rate_limit_error(&error) {
                self.metrics.record_rate_limited();
                if let Some(info) = error.rate_limit() {
                    TracingHooks::on_rate_limit_exceeded(info);
                }
            }
            TracingHooks::on_request_complete(&method_name, &url, status, elapsed);
            return Err(error);
        }

        let body = match Self::parse_body(&bytes) {
            Ok(body) => body,
            Err(e) => {
                timer.failure();
                let error = GitHubError::deserialization(format!(
                    "Response body is not valid JSON: {}",
                    e
                ));
                TracingHooks::on_request_error(&method_name, &url, &error.to_string());
                return Err(error);
            }
        };

        let elapsed = timer.success();
        if let Some(info) = extract_rate_limit(&headers) {
            TracingHooks::on_rate_limit_update(&info);
        }
        TracingHooks::on_request_complete(&method_name, &url, status, elapsed);

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
