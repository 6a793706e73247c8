//! Pagination handling for GitHub collection endpoints.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::observability::TracingHooks;
use crate::transport::{decode_value, RawResponse, Transport};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Pagination links parsed from Link header.
#[derive(Debug, Clone, Default)]
pub struct PaginationLinks {
    /// URL for the next page.
    pub next: Option<String>,
    /// URL for the previous page.
    pub prev: Option<String>,
    /// URL for the first page.
    pub first: Option<String>,
    /// URL for the last page.
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Parses pagination links from the Link header (RFC 8288).
    ///
    /// Target URLs are read between `<` and `>`, so commas inside a query
    /// string do not split a link.
    pub fn from_header(header_value: &str) -> Self {
        let mut links = Self::default();
        let mut rest = header_value;

        while let Some(open) = rest.find('<') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('>') else {
                break;
            };
            let url = &after[..close];
            let tail = &after[close + 1..];
            let params_len = param_span(tail);
            let params = &tail[..params_len];
            rest = &tail[params_len..];

            let rel = params
                .split(';')
                .filter_map(|param| param.trim().strip_prefix("rel="))
                .map(|value| value.trim().trim_matches('"'))
                .next();

            // rel may carry several space-separated relation types
            for rel in rel.into_iter().flat_map(str::split_whitespace) {
                let slot = match rel {
                    "next" => &mut links.next,
                    "prev" => &mut links.prev,
                    "first" => &mut links.first,
                    "last" => &mut links.last,
                    _ => continue,
                };
                *slot = Some(url.to_string());
            }
        }

        links
    }

    /// Parses pagination links from response headers.
    pub fn from_response(response: &RawResponse) -> Self {
        response
            .header("link")
            .map(Self::from_header)
            .unwrap_or_default()
    }

    /// Returns true if there is a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Gets the total page count from the last link.
    pub fn total_pages(&self) -> Option<u32> {
        self.last.as_deref().and_then(extract_page_number)
    }
}

/// Length of the parameter list following a link target, up to the comma
/// that separates it from the next link. Commas inside quotes are skipped.
fn param_span(tail: &str) -> usize {
    let mut in_quotes = false;
    for (i, c) in tail.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return i,
            _ => {}
        }
    }
    tail.len()
}

/// Extracts page number from a URL.
pub fn extract_page_number(url: &str) -> Option<u32> {
    url::Url::parse(url).ok().and_then(|u| {
        u.query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
    })
}

/// Where a collection endpoint keeps its next-page pointer and its items.
pub trait PageLinkConvention: Send + Sync {
    /// Returns the next page URL, or `None` on the final page.
    fn next(&self, response: &RawResponse) -> Option<String>;

    /// Extracts the JSON array of items from the page body.
    fn items(&self, body: Value) -> GitHubResult<Vec<Value>> {
        match body {
            Value::Array(items) => Ok(items),
            other => Err(GitHubError::new(
                GitHubErrorKind::UnexpectedFormat,
                format!("Expected a JSON array page, got {}", json_type(&other)),
            )),
        }
    }
}

/// GitHub's convention: bare array body, `Link: <...>; rel="next"` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkHeader;

impl PageLinkConvention for LinkHeader {
    fn next(&self, response: &RawResponse) -> Option<String> {
        PaginationLinks::from_response(response).next
    }
}

/// Envelope convention: `{ "<items_field>": [...], "<next_field>": "url" | null }`.
#[derive(Debug, Clone)]
pub struct EnvelopeCursor {
    /// Field holding the page items.
    pub items_field: String,
    /// Field holding the next page URL.
    pub next_field: String,
}

impl EnvelopeCursor {
    /// Creates an envelope convention.
    pub fn new(items_field: impl Into<String>, next_field: impl Into<String>) -> Self {
        Self {
            items_field: items_field.into(),
            next_field: next_field.into(),
        }
    }
}

impl PageLinkConvention for EnvelopeCursor {
    fn next(&self, response: &RawResponse) -> Option<String> {
        response
            .body
            .get(&self.next_field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn items(&self, mut body: Value) -> GitHubResult<Vec<Value>> {
        match body.get_mut(&self.items_field).map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(GitHubError::new(
                GitHubErrorKind::UnexpectedFormat,
                format!(
                    "Expected `{}` to be an array, got {}",
                    self.items_field,
                    json_type(&other)
                ),
            )),
            None => Err(GitHubError::new(
                GitHubErrorKind::UnexpectedFormat,
                format!("Page envelope has no `{}` field", self.items_field),
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

type ItemBuilder<T> = Arc<dyn Fn(Value) -> GitHubResult<T> + Send + Sync>;

/// A lazily paginated collection endpoint.
///
/// Every call to [`iterate`](Self::iterate) starts a fresh traversal from the
/// first page. Pages are fetched only when the consumer reaches them, and a
/// whole page is decoded before any of its items is yielded.
pub struct PaginatedCollection<T> {
    transport: Arc<dyn Transport>,
    path: String,
    per_page: u32,
    max_pages: u32,
    convention: Arc<dyn PageLinkConvention>,
    build: ItemBuilder<T>,
}

impl<T> Clone for PaginatedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            path: self.path.clone(),
            per_page: self.per_page,
            max_pages: self.max_pages,
            convention: self.convention.clone(),
            build: self.build.clone(),
        }
    }
}

impl<T: DeserializeOwned + Send + 'static> PaginatedCollection<T> {
    /// Creates a collection whose items are decoded straight from JSON.
    pub fn new(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        per_page: u32,
        max_pages: u32,
    ) -> Self {
        Self::with_builder(transport, path, per_page, max_pages, decode_value::<T>)
    }
}

impl<T: Send + 'static> PaginatedCollection<T> {
    /// Creates a collection that turns each JSON item into `T` with `build`.
    pub fn with_builder<F>(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        per_page: u32,
        max_pages: u32,
        build: F,
    ) -> Self
    where
        F: Fn(Value) -> GitHubResult<T> + Send + Sync + 'static,
    {
        Self {
            transport,
            path: path.into(),
            per_page,
            max_pages,
            convention: Arc::new(LinkHeader),
            build: Arc::new(build),
        }
    }

    /// Replaces the next-link convention.
    pub fn with_convention(mut self, convention: impl PageLinkConvention + 'static) -> Self {
        self.convention = Arc::new(convention);
        self
    }

    /// Gets the collection path.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn first_page(&self) -> String {
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}per_page={}", self.path, separator, self.per_page)
    }

    /// Streams every item across all pages in server order.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<T>> {
        let cursor = Cursor {
            transport: self.transport.clone(),
            convention: self.convention.clone(),
            build: self.build.clone(),
            collection: self.path.clone(),
            next: Some(self.first_page()),
            visited: HashSet::new(),
            fetched: 0,
            max_pages: self.max_pages,
        };

        stream::try_unfold(cursor, Cursor::advance)
            .map_ok(|page: Vec<T>| stream::iter(page.into_iter().map(Ok::<T, GitHubError>)))
            .try_flatten()
            .boxed()
    }

    /// Collects all items from all pages.
    pub async fn collect_all(&self) -> GitHubResult<Vec<T>> {
        self.iterate().try_collect().await
    }

    /// Returns the first item, fetching only the first page.
    pub async fn first(&self) -> GitHubResult<Option<T>> {
        self.iterate().try_next().await
    }

    /// Returns the last item, walking every page.
    pub async fn last(&self) -> GitHubResult<Option<T>> {
        self.iterate()
            .try_fold(None, |_, item| async move { Ok::<_, GitHubError>(Some(item)) })
            .await
    }

    /// Counts the items across all pages.
    pub async fn count(&self) -> GitHubResult<usize> {
        self.iterate()
            .try_fold(0usize, |n, _| async move { Ok::<_, GitHubError>(n + 1) })
            .await
    }
}

/// Path and query of a page URL, so absolute links compare equal to the
/// relative first page.
fn page_key(url: &str) -> &str {
    match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("/", |slash| &rest[slash..])
        }
        None => url,
    }
}

/// Per-traversal state; never shared between traversals.
struct Cursor<T> {
    transport: Arc<dyn Transport>,
    convention: Arc<dyn PageLinkConvention>,
    build: ItemBuilder<T>,
    collection: String,
    next: Option<String>,
    visited: HashSet<String>,
    fetched: u32,
    max_pages: u32,
}

impl<T> Cursor<T> {
    async fn advance(mut self) -> GitHubResult<Option<(Vec<T>, Self)>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        if self.fetched >= self.max_pages {
            return Err(GitHubError::new(
                GitHubErrorKind::PageLimitExceeded,
                format!("Stopped after {} pages", self.max_pages),
            )
            .with_context("collection.iterate", self.collection.clone()));
        }

        let response = self
            .transport
            .request(Method::GET, &url, None)
            .await
            .map_err(|e| e.with_context("collection.iterate", url.clone()))?;
        self.fetched += 1;

        self.visited.insert(page_key(&url).to_string());
        let next = self.convention.next(&response);
        if let Some(ref link) = next {
            if self.visited.contains(page_key(link)) {
                return Err(GitHubError::new(
                    GitHubErrorKind::PaginationLoop,
                    format!("Next link points back at an already fetched page: {}", link),
                )
                .with_context("collection.iterate", url));
            }
        }

        let items = self
            .convention
            .items(response.body)
            .map_err(|e| e.with_context("collection.iterate", url.clone()))?;
        let page = items
            .into_iter()
            .map(|item| (self.build)(item))
            .collect::<GitHubResult<Vec<T>>>()
            .map_err(|e| e.with_context("collection.iterate", url.clone()))?;

        TracingHooks::on_page_fetched(&self.collection, self.fetched, page.len(), next.is_some());
        self.next = next;
        Ok(Some((page, self)))
    }
}
