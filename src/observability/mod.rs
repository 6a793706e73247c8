//! Logging and request metrics.

use crate::errors::RateLimitInfo;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// Metrics collector for GitHub API requests.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total requests made.
    requests_total: AtomicU64,
    /// Successful requests.
    requests_success: AtomicU64,
    /// Failed requests.
    requests_failed: AtomicU64,
    /// Requests rejected by rate limiting.
    requests_rate_limited: AtomicU64,
    /// Total request latency in microseconds.
    latency_total_us: AtomicU64,
    /// Request count for latency calculation.
    latency_count: AtomicU64,
}

impl Metrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request.
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successful request.
    pub fn record_success(&self) {
        self.requests_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed request.
    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rate-limited request.
    pub fn record_rate_limited(&self) {
        self.requests_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    /// Records request latency.
    pub fn record_latency(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.latency_total_us.fetch_add(us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the total request count.
    pub fn total_requests(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Gets the successful request count.
    pub fn successful_requests(&self) -> u64 {
        self.requests_success.load(Ordering::Relaxed)
    }

    /// Gets the failed request count.
    pub fn failed_requests(&self) -> u64 {
        self.requests_failed.load(Ordering::Relaxed)
    }

    /// Gets the rate-limited request count.
    pub fn rate_limited_requests(&self) -> u64 {
        self.requests_rate_limited.load(Ordering::Relaxed)
    }

    /// Gets the average latency in microseconds.
    pub fn average_latency_us(&self) -> u64 {
        let total = self.latency_total_us.load(Ordering::Relaxed);
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 {
            0
        } else {
            total / count
        }
    }

    /// Gets a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.total_requests(),
            requests_success: self.successful_requests(),
            requests_failed: self.failed_requests(),
            requests_rate_limited: self.rate_limited_requests(),
            average_latency_us: self.average_latency_us(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total requests.
    pub requests_total: u64,
    /// Successful requests.
    pub requests_success: u64,
    /// Failed requests.
    pub requests_failed: u64,
    /// Rate-limited requests.
    pub requests_rate_limited: u64,
    /// Average latency in microseconds.
    pub average_latency_us: u64,
}

/// Request timer for measuring latency.
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<Metrics>,
}

impl RequestTimer {
    /// Creates a new request timer.
    pub fn new(metrics: Arc<Metrics>) -> Self {
        metrics.record_request();
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Records success and latency.
    pub fn success(self) -> Duration {
        let elapsed = self.start.elapsed();
        self.metrics.record_success();
        self.metrics.record_latency(elapsed);
        elapsed
    }

    /// Records failure and latency.
    pub fn failure(self) -> Duration {
        let elapsed = self.start.elapsed();
        self.metrics.record_failure();
        self.metrics.record_latency(elapsed);
        elapsed
    }
}

/// Tracing hooks for GitHub API requests.
pub struct TracingHooks;

impl TracingHooks {
    /// Logs the start of an API request.
    pub fn on_request_start(method: &str, url: &str) {
        debug!(
            method = %method,
            url = %url,
            "GitHub API request started"
        );
    }

    /// Logs the completion of an API request.
    pub fn on_request_complete(method: &str, url: &str, status: u16, duration: Duration) {
        info!(
            method = %method,
            url = %url,
            status = status,
            duration_ms = duration.as_millis() as u64,
            "GitHub API request completed"
        );
    }

    /// Logs a request error.
    pub fn on_request_error(method: &str, url: &str, error: &str) {
        error!(
            method = %method,
            url = %url,
            error = %error,
            "GitHub API request failed"
        );
    }

    /// Logs rate limit info.
    pub fn on_rate_limit_update(info: &RateLimitInfo) {
        debug!(
            limit = info.limit,
            remaining = info.remaining,
            reset_at = %info.reset_at,
            resource = info.resource.as_deref().unwrap_or("core"),
            "Rate limit updated"
        );
    }

    /// Logs rate limit exceeded.
    pub fn on_rate_limit_exceeded(info: &RateLimitInfo) {
        warn!(
            limit = info.limit,
            remaining = info.remaining,
            reset_at = %info.reset_at,
            resource = info.resource.as_deref().unwrap_or("core"),
            "Rate limit exceeded"
        );
    }

    /// Logs the headers sent with a request, sensitive values redacted.
    pub fn on_request_headers(method: &str, url: &str, headers: &[(&str, &str)]) {
        trace!(
            method = %method,
            url = %url,
            headers = %format_headers(headers.iter().copied()),
            "GitHub API request headers"
        );
    }

    /// Logs the headers of a response, sensitive values redacted.
    pub fn on_response_headers(method: &str, url: &str, headers: &HashMap<String, String>) {
        trace!(
            method = %method,
            url = %url,
            headers = %format_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
            "GitHub API response headers"
        );
    }

    /// Logs a fetched collection page.
    pub fn on_page_fetched(path: &str, page: u32, items: usize, has_next: bool) {
        debug!(
            path = %path,
            page = page,
            items = items,
            has_next = has_next,
            "Collection page fetched"
        );
    }
}

/// Sensitive headers that should be redacted in logs.
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "x-github-token",
    "x-access-token",
    "cookie",
    "set-cookie",
];

/// Redacts sensitive values in headers.
pub fn redact_header(name: &str, value: &str) -> String {
    if SENSITIVE_HEADERS.contains(&name.to_lowercase().as_str()) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}

/// Renders headers as `name: value` pairs sorted by name, redacting
/// sensitive values.
pub fn format_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut pairs: Vec<String> = headers
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name.to_lowercase(), redact_header(name, value)))
        .collect();
    pairs.sort();
    pairs.join(", ")
}
