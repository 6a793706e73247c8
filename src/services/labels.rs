//! Issue label sets and the repository label catalog.

use crate::errors::{GitHubError, GitHubResult};
use crate::handle::{segment, ResourceHandle};
use crate::pagination::PaginatedCollection;
use crate::services::{Issue, Repo};
use crate::transport::decode_value;
use crate::types::Label;
use futures::stream::BoxStream;
use reqwest::Method;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
struct LabelNames {
    labels: Vec<String>,
}

impl LabelNames {
    /// Collects names in first-seen order, each once.
    fn from_labels<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let mut seen = HashSet::new();
        let labels = labels
            .into_iter()
            .map(|l| l.into().name)
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self { labels }
    }
}

/// The labels one issue wears.
///
/// Adding a name the repository catalog lacks creates it there. Removing a
/// name the issue does not wear fails with not found.
#[derive(Debug, Clone)]
pub struct IssueLabels {
    issue: Issue,
    handle: ResourceHandle,
}

impl IssueLabels {
    pub(crate) fn new(issue: Issue) -> Self {
        let handle = issue.handle().child("labels");
        Self { issue, handle }
    }

    /// Attaches labels. Labels already attached are left as they are.
    ///
    /// An empty set makes no request.
    pub async fn add<I, L>(&self, labels: I) -> GitHubResult<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let names = LabelNames::from_labels(labels);
        if names.labels.is_empty() {
            return Ok(());
        }
        self.handle
            .send_json::<_, Vec<Label>>("labels.add", Method::POST, &names)
            .await
            .map(drop)
    }

    /// Replaces the whole label set.
    pub async fn replace<I, L>(&self, labels: I) -> GitHubResult<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let names = LabelNames::from_labels(labels);
        self.handle
            .send_json::<_, Vec<Label>>("labels.replace", Method::PUT, &names)
            .await
            .map(drop)
    }

    /// Detaches one label by name.
    pub async fn remove(&self, name: &str) -> GitHubResult<()> {
        self.handle
            .child(&segment(name))
            .send("labels.remove", Method::DELETE, None)
            .await
            .map(drop)
    }

    /// Detaches every label. Clearing an empty set succeeds.
    pub async fn clear(&self) -> GitHubResult<()> {
        self.handle
            .send("labels.clear", Method::DELETE, None)
            .await
            .map(drop)
    }

    /// Lists the attached labels.
    pub fn collection(&self) -> PaginatedCollection<Label> {
        self.issue
            .repo()
            .github()
            .collection(self.handle.path(), decode_value::<Label>)
    }

    /// Streams the attached labels.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<Label>> {
        self.collection().iterate()
    }
}

/// Request to create a label.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLabelRequest {
    /// Label name.
    pub name: String,
    /// Label color (hex without #).
    pub color: String,
    /// Label description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update a label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateLabelRequest {
    /// New label name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Label color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn normalize_color(color: &str) -> GitHubResult<String> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GitHubError::invalid_parameter(format!(
            "Label color must be six hex digits, got `{}`",
            color
        )));
    }
    Ok(hex.to_ascii_lowercase())
}

/// A repository's label catalog.
#[derive(Debug, Clone)]
pub struct Labels {
    repo: Repo,
    handle: ResourceHandle,
}

impl Labels {
    pub(crate) fn new(repo: Repo) -> Self {
        let handle = repo.handle().child("labels");
        Self { repo, handle }
    }

    /// Creates a label. `color` may carry a leading `#`.
    pub async fn create(&self, name: &str, color: &str) -> GitHubResult<Label> {
        self.create_with(CreateLabelRequest {
            name: name.to_string(),
            color: color.to_string(),
            description: None,
        })
        .await
    }

    /// Creates a label from a full request.
    pub async fn create_with(&self, mut request: CreateLabelRequest) -> GitHubResult<Label> {
        request.color = normalize_color(&request.color)
            .map_err(|e| e.with_context("labels.create", self.handle.path()))?;
        self.handle
            .send_json("labels.create", Method::POST, &request)
            .await
    }

    /// Fetches a label by name.
    pub async fn get(&self, name: &str) -> GitHubResult<Label> {
        self.handle
            .child(&segment(name))
            .fetch_as("labels.get")
            .await
    }

    /// Updates a label.
    pub async fn update(&self, name: &str, mut request: UpdateLabelRequest) -> GitHubResult<Label> {
        let handle = self.handle.child(&segment(name));
        if let Some(color) = request.color.take() {
            request.color = Some(
                normalize_color(&color).map_err(|e| e.with_context("labels.update", handle.path()))?,
            );
        }
        handle
            .send_json("labels.update", Method::PATCH, &request)
            .await
    }

    /// Deletes a label from the catalog and from every issue wearing it.
    pub async fn delete(&self, name: &str) -> GitHubResult<()> {
        self.handle
            .child(&segment(name))
            .send("labels.delete", Method::DELETE, None)
            .await
            .map(drop)
    }

    /// Lists the catalog.
    pub fn collection(&self) -> PaginatedCollection<Label> {
        self.repo
            .github()
            .collection(self.handle.path(), decode_value::<Label>)
    }

    /// Streams the catalog.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<Label>> {
        self.collection().iterate()
    }
}
