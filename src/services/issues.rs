//! Issue operations.

use crate::errors::{GitHubError, GitHubResult};
use crate::handle::ResourceHandle;
use crate::pagination::PaginatedCollection;
use crate::services::{Comments, Events, IssueLabels, Repo, User};
use crate::transport::decode_value;
use crate::types::{IssueSnapshot, IssueState};
use chrono::{DateTime, Utc};
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Method;
use serde::Serialize;
use std::fmt;

/// The issues of one repository.
#[derive(Debug, Clone)]
pub struct Issues {
    repo: Repo,
    handle: ResourceHandle,
}

impl Issues {
    pub(crate) fn new(repo: Repo) -> Self {
        let handle = repo.handle().child("issues");
        Self { repo, handle }
    }

    /// Creates an issue. It starts open.
    pub async fn create(&self, title: &str, body: &str) -> GitHubResult<Issue> {
        self.create_with(&CreateIssueRequest {
            title: title.to_string(),
            body: Some(body.to_string()),
            labels: None,
            assignees: None,
        })
        .await
    }

    /// Creates an issue from a full request.
    pub async fn create_with(&self, request: &CreateIssueRequest) -> GitHubResult<Issue> {
        require_title(&request.title)
            .map_err(|e| e.with_context("issues.create", self.handle.path()))?;
        let created: IssueSnapshot = self
            .handle
            .send_json("issues.create", Method::POST, request)
            .await?;
        Ok(self.get(created.number))
    }

    /// Gets an issue handle by number. No request is made.
    pub fn get(&self, number: u64) -> Issue {
        Issue::new(self.repo.clone(), number)
    }

    /// Lists the repository's open issues, pull requests included.
    pub fn collection(&self) -> PaginatedCollection<Issue> {
        self.listing(self.handle.path().to_string())
    }

    /// Lists issues matching `params`.
    ///
    /// Fails with an invalid parameter error when the filters cannot be
    /// encoded as a query string.
    pub fn collection_with(&self, params: &ListIssuesParams) -> GitHubResult<PaginatedCollection<Issue>> {
        let query = serde_urlencoded::to_string(params).map_err(|e| {
            GitHubError::invalid_parameter(format!("Failed to encode issue filters: {}", e))
                .with_context("issues.list", self.handle.path())
        })?;
        let path = if query.is_empty() {
            self.handle.path().to_string()
        } else {
            format!("{}?{}", self.handle.path(), query)
        };
        Ok(self.listing(path))
    }

    /// Streams the repository's open issues.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<Issue>> {
        self.collection().iterate()
    }

    /// Streams issues matching `params`. Filter encoding errors surface as
    /// the first item.
    pub fn iterate_with(&self, params: &ListIssuesParams) -> BoxStream<'static, GitHubResult<Issue>> {
        match self.collection_with(params) {
            Ok(collection) => collection.iterate(),
            Err(e) => stream::once(future::ready(Err(e))).boxed(),
        }
    }

    fn listing(&self, path: String) -> PaginatedCollection<Issue> {
        let repo = self.repo.clone();
        self.repo.github().collection(path, move |item| {
            let snapshot: IssueSnapshot = decode_value(item)?;
            Ok(Issue::new(repo.clone(), snapshot.number))
        })
    }
}

/// Handle to one issue, identified by repository and number.
#[derive(Clone)]
pub struct Issue {
    repo: Repo,
    number: u64,
    handle: ResourceHandle,
}

impl Issue {
    pub(crate) fn new(repo: Repo, number: u64) -> Self {
        let handle = repo.handle().child(&format!("issues/{}", number));
        Self {
            repo,
            number,
            handle,
        }
    }

    /// Gets the issue number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Gets the repository.
    pub fn repo(&self) -> &Repo {
        &self.repo
    }

    /// Gets the underlying resource handle.
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Fetches the issue.
    pub async fn fetch(&self) -> GitHubResult<IssueSnapshot> {
        self.handle.fetch_as("issue.fetch").await
    }

    /// Fetches the title.
    pub async fn title(&self) -> GitHubResult<String> {
        Ok(self.fetch().await?.title)
    }

    /// Sets the title. Empty titles are rejected without a request.
    pub async fn set_title(&self, title: &str) -> GitHubResult<()> {
        require_title(title).map_err(|e| e.with_context("issue.set_title", self.handle.path()))?;
        self.update(
            "issue.set_title",
            &UpdateIssueRequest {
                title: Some(title.to_string()),
                ..Default::default()
            },
        )
        .await
        .map(drop)
    }

    /// Fetches the body, empty when the issue has none.
    pub async fn body(&self) -> GitHubResult<String> {
        Ok(self.fetch().await?.body.unwrap_or_default())
    }

    /// Sets the body.
    pub async fn set_body(&self, body: &str) -> GitHubResult<()> {
        self.update(
            "issue.set_body",
            &UpdateIssueRequest {
                body: Some(body.to_string()),
                ..Default::default()
            },
        )
        .await
        .map(drop)
    }

    /// Fetches the state.
    pub async fn state(&self) -> GitHubResult<IssueState> {
        Ok(self.fetch().await?.state)
    }

    /// Returns true if the issue is currently open.
    pub async fn is_open(&self) -> GitHubResult<bool> {
        Ok(self.fetch().await?.is_open())
    }

    /// Reopens the issue. Reopening an open issue succeeds.
    pub async fn open(&self) -> GitHubResult<()> {
        self.transition("issue.open", IssueState::Open, None).await
    }

    /// Closes the issue. Closing a closed issue succeeds.
    pub async fn close(&self) -> GitHubResult<()> {
        self.transition("issue.close", IssueState::Closed, None).await
    }

    /// Closes the issue with a reason.
    pub async fn close_as(&self, reason: StateReason) -> GitHubResult<()> {
        self.transition("issue.close", IssueState::Closed, Some(reason))
            .await
    }

    /// Returns true if the issue is a pull request.
    pub async fn is_pull(&self) -> GitHubResult<bool> {
        Ok(self.fetch().await?.is_pull())
    }

    /// Fetches the author.
    pub async fn author(&self) -> GitHubResult<User> {
        let snapshot = self.fetch().await?;
        Ok(User::new(self.repo.github(), &snapshot.user.login))
    }

    /// Applies a partial update and returns the updated issue.
    pub async fn patch(&self, request: &UpdateIssueRequest) -> GitHubResult<IssueSnapshot> {
        if let Some(ref title) = request.title {
            require_title(title).map_err(|e| e.with_context("issue.patch", self.handle.path()))?;
        }
        self.update("issue.patch", request).await
    }

    /// Gets the issue's comments.
    pub fn comments(&self) -> Comments {
        Comments::new(self.clone())
    }

    /// Gets the issue's labels.
    pub fn labels(&self) -> IssueLabels {
        IssueLabels::new(self.clone())
    }

    /// Gets the issue's event trail.
    pub fn events(&self) -> Events {
        Events::new(self.clone())
    }

    async fn transition(
        &self,
        operation: &str,
        state: IssueState,
        state_reason: Option<StateReason>,
    ) -> GitHubResult<()> {
        self.update(
            operation,
            &UpdateIssueRequest {
                state: Some(state),
                state_reason,
                ..Default::default()
            },
        )
        .await
        .map(drop)
    }

    async fn update(
        &self,
        operation: &str,
        request: &UpdateIssueRequest,
    ) -> GitHubResult<IssueSnapshot> {
        self.handle
            .send_json(operation, Method::PATCH, request)
            .await
    }
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        self.repo == other.repo && self.number == other.number
    }
}

impl Eq for Issue {}

impl fmt::Debug for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Issue({}#{})", self.repo.coordinates(), self.number)
    }
}

fn require_title(title: &str) -> GitHubResult<()> {
    if title.trim().is_empty() {
        return Err(GitHubError::invalid_parameter("Issue title cannot be empty"));
    }
    Ok(())
}

/// Parameters for listing issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListIssuesParams {
    /// Filter by state. GitHub defaults to open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueStateFilter>,
    /// Filter by labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Filter by assignee login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Filter by creator login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<IssueSort>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    /// Only issues updated at or after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

impl ListIssuesParams {
    /// Filters by state.
    pub fn state(mut self, state: IssueStateFilter) -> Self {
        self.state = Some(state);
        self
    }

    /// Filters by labels; an issue must wear all of them.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = labels
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.labels = Some(joined);
        self
    }

    /// Sets the sort order.
    pub fn sort(mut self, sort: IssueSort, direction: SortDirection) -> Self {
        self.sort = Some(sort);
        self.direction = Some(direction);
        self
    }
}

/// Issue state filter.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    /// Open issues only.
    Open,
    /// Closed issues only.
    Closed,
    /// Both.
    All,
}

/// Issue sort field.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Comment count.
    Comments,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Request to create an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Assignees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

/// Request to update an issue. Only the fields set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIssueRequest {
    /// Issue title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Issue body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Issue state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    /// State reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<StateReason>,
    /// Replaces the label set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Replaces the assignees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}

/// State reason for closing an issue.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    /// Done.
    Completed,
    /// Won't fix or duplicate.
    NotPlanned,
    /// Reopened.
    Reopened,
}
