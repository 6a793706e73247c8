//! GitHub Issues client entry point.

use crate::auth::AuthMethod;
use crate::config::{GitHubConfig, GitHubConfigBuilder};
use crate::errors::GitHubResult;
use crate::observability::Metrics;
use crate::pagination::PaginatedCollection;
use crate::services::{Repo, Users};
use crate::transport::{HttpTransport, Transport};
use crate::types::RepoCoordinates;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

struct ClientInner {
    config: GitHubConfig,
    transport: Arc<dyn Transport>,
    metrics: Option<Arc<Metrics>>,
}

/// GitHub Issues client.
///
/// The client is the only factory for repository handles. It is cheap to
/// clone and every clone shares the same transport.
#[derive(Clone)]
pub struct GitHubClient {
    inner: Arc<ClientInner>,
}

impl GitHubClient {
    /// Creates a client talking HTTP to `config.base_url`.
    ///
    /// Fails with a configuration error when no token is configured or the
    /// token is malformed.
    pub fn new(config: GitHubConfig) -> GitHubResult<Self> {
        let transport = HttpTransport::new(&config)?;
        let metrics = transport.metrics();
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport: Arc::new(transport),
                metrics: Some(metrics),
            }),
        })
    }

    /// Creates a client routed through a caller-supplied transport.
    pub fn with_transport(
        config: GitHubConfig,
        transport: Arc<dyn Transport>,
    ) -> GitHubResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                metrics: None,
            }),
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Gets the configuration.
    pub fn config(&self) -> &GitHubConfig {
        &self.inner.config
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    /// Gets the transport.
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.inner.transport.clone()
    }

    /// Gets request metrics, when the client owns its HTTP transport.
    pub fn metrics(&self) -> Option<Arc<Metrics>> {
        self.inner.metrics.clone()
    }

    /// Gets a repository handle from `"owner/name"`. No request is made.
    pub fn repo(&self, full_name: &str) -> GitHubResult<Repo> {
        Ok(Repo::new(self.clone(), full_name.parse()?))
    }

    /// Gets a repository handle from its parts. No request is made.
    pub fn repo_of(&self, owner: impl Into<String>, name: impl Into<String>) -> GitHubResult<Repo> {
        Ok(Repo::new(self.clone(), RepoCoordinates::new(owner, name)?))
    }

    /// Gets the users accessor.
    pub fn users(&self) -> Users {
        Users::new(self.clone())
    }

    /// Builds a collection over `path` using the configured paging bounds.
    pub(crate) fn collection<T, F>(&self, path: impl Into<String>, build: F) -> PaginatedCollection<T>
    where
        T: Send + 'static,
        F: Fn(Value) -> GitHubResult<T> + Send + Sync + 'static,
    {
        PaginatedCollection::with_builder(
            self.transport(),
            path,
            self.inner.config.per_page,
            self.inner.config.max_pages,
            build,
        )
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.inner.config.base_url)
            .field("per_page", &self.inner.config.per_page)
            .field("max_pages", &self.inner.config.max_pages)
            .finish_non_exhaustive()
    }
}

/// Builder for GitHubClient.
pub struct GitHubClientBuilder {
    config_builder: GitHubConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
}

impl GitHubClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: GitHubConfig::builder(),
            transport: None,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.config_builder = self.config_builder.auth(auth);
        self
    }

    /// Sets a personal access token.
    pub fn pat(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::pat(token))
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Sets the page size for collection traversals.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.config_builder = self.config_builder.per_page(per_page);
        self
    }

    /// Sets the page bound for one traversal.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.config_builder = self.config_builder.max_pages(max_pages);
        self
    }

    /// Routes requests through `transport` instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GitHubResult<GitHubClient> {
        let config = self.config_builder.build()?;
        match self.transport {
            Some(transport) => GitHubClient::with_transport(config, transport),
            None => GitHubClient::new(config),
        }
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
