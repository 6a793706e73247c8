//! Error types for the GitHub Issues client.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Result type alias for GitHub operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// Error kinds for categorizing GitHub errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubErrorKind {
    // Configuration errors
    /// Missing authentication configuration.
    MissingAuth,
    /// Token is empty or malformed.
    InvalidToken,
    /// Invalid base URL.
    InvalidBaseUrl,
    /// Invalid configuration.
    InvalidConfiguration,
    /// Invalid parameter supplied by the caller.
    InvalidParameter,

    // Authentication / authorization errors
    /// Bad credentials (401).
    BadCredentials,
    /// Access forbidden (403).
    Forbidden,

    // Request errors
    /// Request validation failed (400).
    ValidationError,
    /// Unprocessable entity (422).
    UnprocessableEntity,

    // Resource errors
    /// Resource not found (404).
    NotFound,
    /// Resource is gone (410).
    Gone,
    /// Resource conflict (409).
    Conflict,

    // Rate limit errors
    /// Primary rate limit exceeded.
    PrimaryRateLimitExceeded,
    /// Secondary rate limit exceeded.
    SecondaryRateLimitExceeded,

    // Network errors
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,
    /// Request could not be sent.
    RequestFailed,

    // Server errors
    /// Internal server error (500).
    InternalError,
    /// Bad gateway (502).
    BadGateway,
    /// Service unavailable (503).
    ServiceUnavailable,

    // Response errors
    /// Failed to deserialize response.
    DeserializationError,
    /// Unexpected response format.
    UnexpectedFormat,

    // Pagination errors
    /// The page-count bound was reached while next links kept coming.
    PageLimitExceeded,
    /// A next link pointed back at the page just fetched.
    PaginationLoop,

    // Generic
    /// Unknown error.
    Unknown,
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuth => write!(f, "missing_auth"),
            Self::InvalidToken => write!(f, "invalid_token"),
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::BadCredentials => write!(f, "bad_credentials"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::NotFound => write!(f, "not_found"),
            Self::Gone => write!(f, "gone"),
            Self::Conflict => write!(f, "conflict"),
            Self::PrimaryRateLimitExceeded => write!(f, "primary_rate_limit_exceeded"),
            Self::SecondaryRateLimitExceeded => write!(f, "secondary_rate_limit_exceeded"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::RequestFailed => write!(f, "request_failed"),
            Self::InternalError => write!(f, "internal_error"),
            Self::BadGateway => write!(f, "bad_gateway"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::DeserializationError => write!(f, "deserialization_error"),
            Self::UnexpectedFormat => write!(f, "unexpected_format"),
            Self::PageLimitExceeded => write!(f, "page_limit_exceeded"),
            Self::PaginationLoop => write!(f, "pagination_loop"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Coarse error taxonomy callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The client was configured or called with invalid input.
    Configuration,
    /// The request never produced an HTTP response.
    Transport,
    /// The service answered with a non-2xx status.
    Api,
    /// The response body did not have the expected shape.
    Decoding,
    /// Next-page link following was cut short.
    Pagination,
}

/// Rate limit information extracted from response headers.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Maximum requests allowed.
    pub limit: u32,
    /// Remaining requests in current window.
    pub remaining: u32,
    /// Time when the rate limit resets.
    pub reset_at: DateTime<Utc>,
    /// Retry-After header value in seconds (if present).
    pub retry_after: Option<u64>,
    /// Resource category.
    pub resource: Option<String>,
}

/// GitHub API error with detailed information.
#[derive(Error, Debug)]
pub struct GitHubError {
    /// Error kind.
    kind: GitHubErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code.
    status_code: Option<u16>,
    /// GitHub request ID.
    request_id: Option<String>,
    /// Documentation URL.
    documentation_url: Option<String>,
    /// Parsed error payload returned by the service.
    payload: Option<serde_json::Value>,
    /// Operation that failed, e.g. `issue.close`.
    operation: Option<String>,
    /// Request path the operation was routed to.
    path: Option<String>,
    /// Rate limit info (if applicable).
    rate_limit: Option<RateLimitInfo>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref op) = self.operation {
            write!(f, " during {}", op)?;
        }
        if let Some(ref path) = self.path {
            write!(f, " at {}", path)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl GitHubError {
    /// Creates a new GitHub error.
    pub fn new(kind: GitHubErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            documentation_url: None,
            payload: None,
            operation: None,
            path: None,
            rate_limit: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the GitHub request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the documentation URL.
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Sets the parsed error payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attaches the failing operation and path.
    ///
    /// Context already present is kept, so the innermost operation wins.
    pub fn with_context(mut self, operation: impl Into<String>, path: impl Into<String>) -> Self {
        if self.operation.is_none() {
            self.operation = Some(operation.into());
        }
        if self.path.is_none() {
            self.path = Some(path.into());
        }
        self
    }

    /// Sets the rate limit info.
    pub fn with_rate_limit(mut self, info: RateLimitInfo) -> Self {
        self.rate_limit = Some(info);
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &GitHubErrorKind {
        &self.kind
    }

    /// Gets the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the error category.
    pub fn category(&self) -> ErrorCategory {
        if self.status_code.is_some() {
            return ErrorCategory::Api;
        }
        match self.kind {
            GitHubErrorKind::MissingAuth
            | GitHubErrorKind::InvalidToken
            | GitHubErrorKind::InvalidBaseUrl
            | GitHubErrorKind::InvalidConfiguration
            | GitHubErrorKind::InvalidParameter => ErrorCategory::Configuration,
            GitHubErrorKind::ConnectionFailed
            | GitHubErrorKind::Timeout
            | GitHubErrorKind::RequestFailed
            | GitHubErrorKind::Unknown => ErrorCategory::Transport,
            GitHubErrorKind::DeserializationError | GitHubErrorKind::UnexpectedFormat => {
                ErrorCategory::Decoding
            }
            GitHubErrorKind::PageLimitExceeded | GitHubErrorKind::PaginationLoop => {
                ErrorCategory::Pagination
            }
            _ => ErrorCategory::Api,
        }
    }

    /// Gets the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the documentation URL.
    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// Gets the parsed error payload.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Gets the failing operation.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Gets the request path.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Gets the rate limit info.
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        self.rate_limit.as_ref()
    }

    /// Returns the retry-after duration in seconds.
    pub fn retry_after(&self) -> Option<u64> {
        let rl = self.rate_limit.as_ref()?;
        rl.retry_after.or_else(|| {
            let now = Utc::now();
            if rl.reset_at > now {
                Some((rl.reset_at - now).num_seconds() as u64)
            } else {
                None
            }
        })
    }

    /// Returns true if this is a 404 from the service.
    pub fn is_not_found(&self) -> bool {
        self.kind == GitHubErrorKind::NotFound
    }

    /// Returns true if a surrounding policy could sensibly retry this error.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            GitHubErrorKind::PrimaryRateLimitExceeded
                | GitHubErrorKind::SecondaryRateLimitExceeded
                | GitHubErrorKind::ConnectionFailed
                | GitHubErrorKind::Timeout
                | GitHubErrorKind::InternalError
                | GitHubErrorKind::BadGateway
                | GitHubErrorKind::ServiceUnavailable
        )
    }

    /// Creates an error from an HTTP status code and GitHub error response.
    pub fn from_response(
        status: u16,
        message: String,
        documentation_url: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        let kind = Self::kind_from_status(status);
        let mut error = Self::new(kind, message).with_status(status);

        if let Some(url) = documentation_url {
            error = error.with_documentation_url(url);
        }
        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }

        error
    }

    /// Maps HTTP status code to error kind.
    fn kind_from_status(status: u16) -> GitHubErrorKind {
        match status {
            400 => GitHubErrorKind::ValidationError,
            401 => GitHubErrorKind::BadCredentials,
            403 => GitHubErrorKind::Forbidden,
            404 => GitHubErrorKind::NotFound,
            409 => GitHubErrorKind::Conflict,
            410 => GitHubErrorKind::Gone,
            422 => GitHubErrorKind::UnprocessableEntity,
            429 => GitHubErrorKind::SecondaryRateLimitExceeded,
            500 => GitHubErrorKind::InternalError,
            502 => GitHubErrorKind::BadGateway,
            503 => GitHubErrorKind::ServiceUnavailable,
            _ => GitHubErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidConfiguration, message)
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidParameter, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::NotFound, message).with_status(404)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(status: u16, info: RateLimitInfo) -> Self {
        Self::new(
            GitHubErrorKind::PrimaryRateLimitExceeded,
            "Rate limit exceeded",
        )
        .with_status(status)
        .with_rate_limit(info)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::Timeout, message)
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::DeserializationError, message)
    }
}

/// Checks if an error is a rate limit error.
pub fn is_rate_limit_error(error: &GitHubError) -> bool {
    matches!(
        error.kind(),
        GitHubErrorKind::PrimaryRateLimitExceeded | GitHubErrorKind::SecondaryRateLimitExceeded
    )
}
