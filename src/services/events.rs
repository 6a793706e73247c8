//! Issue event trail (read-only).

use crate::errors::GitHubResult;
use crate::handle::ResourceHandle;
use crate::pagination::PaginatedCollection;
use crate::services::{Issue, Repo};
use crate::types::{EventType, IssueEvent};
use futures::stream::BoxStream;
use std::fmt;

/// The events of one issue, oldest first.
#[derive(Debug, Clone)]
pub struct Events {
    issue: Issue,
    handle: ResourceHandle,
}

impl Events {
    pub(crate) fn new(issue: Issue) -> Self {
        let handle = issue.handle().child("events");
        Self { issue, handle }
    }

    /// Lists the events.
    pub fn collection(&self) -> PaginatedCollection<IssueEvent> {
        let github = self.issue.repo().github();
        PaginatedCollection::new(
            github.transport(),
            self.handle.path(),
            github.config().per_page,
            github.config().max_pages,
        )
    }

    /// Streams the events in occurrence order.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<IssueEvent>> {
        self.collection().iterate()
    }

    /// Returns the most recent event, walking every page.
    pub async fn latest(&self) -> GitHubResult<Option<IssueEvent>> {
        self.collection().last().await
    }

    /// Gets an event handle by id. No request is made.
    pub fn get(&self, id: u64) -> Event {
        Event::new(self.issue.repo(), id)
    }
}

/// Handle to one issue event.
#[derive(Clone, PartialEq, Eq)]
pub struct Event {
    id: u64,
    handle: ResourceHandle,
}

impl Event {
    pub(crate) fn new(repo: &Repo, id: u64) -> Self {
        // events are addressed per repository
        let handle = repo.handle().child(&format!("issues/events/{}", id));
        Self { id, handle }
    }

    /// Gets the event id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Fetches the event.
    pub async fn fetch(&self) -> GitHubResult<IssueEvent> {
        self.handle.fetch_as("event.fetch").await
    }

    /// Fetches the event type.
    pub async fn event_type(&self) -> GitHubResult<EventType> {
        Ok(self.fetch().await?.event)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("path", &self.handle.path())
            .finish()
    }
}
