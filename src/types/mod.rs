//! Snapshot types decoded from GitHub Issues responses.
//!
//! A snapshot is a point-in-time copy of a remote resource. It is decoded once
//! per fetch and never updated in place; handles re-fetch to observe changes.

use crate::errors::{GitHubError, GitHubResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Repository identity: `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoCoordinates {
    /// Owner login (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoCoordinates {
    /// Creates coordinates from their parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> GitHubResult<Self> {
        let owner = owner.into();
        let name = name.into();
        if owner.trim().is_empty() || name.trim().is_empty() {
            return Err(GitHubError::invalid_parameter(
                "Repository owner and name must be non-empty",
            ));
        }
        Ok(Self { owner, name })
    }
}

impl FromStr for RepoCoordinates {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => Err(GitHubError::invalid_parameter(format!(
                "Expected repository as `owner/name`, got `{}`",
                s
            ))),
        }
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// GitHub user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    /// User ID.
    pub id: u64,
    /// Login name.
    pub login: String,
    /// Display name. Only present on full user representations.
    #[serde(default)]
    pub name: Option<String>,
    /// Account type ("User", "Organization", "Bot").
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// GitHub repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    /// Repository ID.
    pub id: u64,
    /// Repository name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Owner.
    pub owner: UserSnapshot,
    /// Private flag.
    #[serde(default)]
    pub private: bool,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default branch.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Open issue count (pull requests included).
    #[serde(default)]
    pub open_issues_count: u32,
    /// Whether issues are enabled.
    #[serde(default)]
    pub has_issues: bool,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Issue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open issue.
    Open,
    /// Closed issue.
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// Marker GitHub attaches to issues that are pull requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// API URL of the pull request.
    #[serde(default)]
    pub url: Option<String>,
    /// HTML URL of the pull request.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// GitHub issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Issue ID.
    pub id: u64,
    /// Issue number, unique within the repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body.
    #[serde(default)]
    pub body: Option<String>,
    /// Issue state.
    pub state: IssueState,
    /// Issue author.
    pub user: UserSnapshot,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Comment count.
    #[serde(default)]
    pub comments: u32,
    /// Present when the issue is a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestRef>,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Close time.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl IssueSnapshot {
    /// Returns true if the issue is open.
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    /// Returns true if the issue is a pull request.
    pub fn is_pull(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Gets the body, empty when GitHub returned none.
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Issue comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentSnapshot {
    /// Comment ID.
    pub id: u64,
    /// Comment body.
    #[serde(default)]
    pub body: String,
    /// Comment author.
    pub user: UserSnapshot,
    /// HTML URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// GitHub label.
///
/// Labels are identified by name; two labels with the same name are equal
/// whatever their color or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Label ID, absent on labels built locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Label name.
    pub name: String,
    /// Label color (hex without #).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Label description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default label flag.
    #[serde(default)]
    pub default: bool,
}

impl Label {
    /// Creates a label with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
            description: None,
            default: false,
        }
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Label {}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::new(name)
    }
}

/// Issue event type.
///
/// GitHub adds event types over time; unknown names are kept verbatim in
/// [`EventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// `closed`
    Closed,
    /// `reopened`
    Reopened,
    /// `labeled`
    Labeled,
    /// `unlabeled`
    Unlabeled,
    /// `renamed`
    Renamed,
    /// `assigned`
    Assigned,
    /// `unassigned`
    Unassigned,
    /// `milestoned`
    Milestoned,
    /// `demilestoned`
    Demilestoned,
    /// `locked`
    Locked,
    /// `unlocked`
    Unlocked,
    /// `referenced`
    Referenced,
    /// `mentioned`
    Mentioned,
    /// `subscribed`
    Subscribed,
    /// `unsubscribed`
    Unsubscribed,
    /// `pinned`
    Pinned,
    /// `unpinned`
    Unpinned,
    /// `transferred`
    Transferred,
    /// Any event type not listed above.
    Other(String),
}

impl EventType {
    /// Gets the wire name.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Closed => "closed",
            EventType::Reopened => "reopened",
            EventType::Labeled => "labeled",
            EventType::Unlabeled => "unlabeled",
            EventType::Renamed => "renamed",
            EventType::Assigned => "assigned",
            EventType::Unassigned => "unassigned",
            EventType::Milestoned => "milestoned",
            EventType::Demilestoned => "demilestoned",
            EventType::Locked => "locked",
            EventType::Unlocked => "unlocked",
            EventType::Referenced => "referenced",
            EventType::Mentioned => "mentioned",
            EventType::Subscribed => "subscribed",
            EventType::Unsubscribed => "unsubscribed",
            EventType::Pinned => "pinned",
            EventType::Unpinned => "unpinned",
            EventType::Transferred => "transferred",
            EventType::Other(name) => name,
        }
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "closed" => EventType::Closed,
            "reopened" => EventType::Reopened,
            "labeled" => EventType::Labeled,
            "unlabeled" => EventType::Unlabeled,
            "renamed" => EventType::Renamed,
            "assigned" => EventType::Assigned,
            "unassigned" => EventType::Unassigned,
            "milestoned" => EventType::Milestoned,
            "demilestoned" => EventType::Demilestoned,
            "locked" => EventType::Locked,
            "unlocked" => EventType::Unlocked,
            "referenced" => EventType::Referenced,
            "mentioned" => EventType::Mentioned,
            "subscribed" => EventType::Subscribed,
            "unsubscribed" => EventType::Unsubscribed,
            "pinned" => EventType::Pinned,
            "unpinned" => EventType::Unpinned,
            "transferred" => EventType::Transferred,
            _ => EventType::Other(name),
        }
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        event.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title change carried by `renamed` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rename {
    /// Previous title.
    pub from: String,
    /// New title.
    pub to: String,
}

/// Issue event from the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEvent {
    /// Event ID.
    pub id: u64,
    /// Event type.
    pub event: EventType,
    /// User who triggered the event. Absent for deleted accounts.
    #[serde(default)]
    pub actor: Option<UserSnapshot>,
    /// Commit that caused the event, if any.
    #[serde(default)]
    pub commit_id: Option<String>,
    /// Label added or removed by `labeled`/`unlabeled` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Title change of `renamed` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<Rename>,
    /// Time the event occurred.
    pub created_at: DateTime<Utc>,
}
