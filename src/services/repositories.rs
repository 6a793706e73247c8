//! Repository handle.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::handle::{segment, ResourceHandle};
use crate::services::{Issues, Labels};
use crate::types::{RepoCoordinates, RepoSnapshot};
use std::fmt;

/// Handle to one repository.
///
/// Repositories are read-only here; they are the root from which issue and
/// label handles are derived.
#[derive(Clone)]
pub struct Repo {
    client: GitHubClient,
    coordinates: RepoCoordinates,
    handle: ResourceHandle,
}

impl Repo {
    pub(crate) fn new(client: GitHubClient, coordinates: RepoCoordinates) -> Self {
        let path = format!(
            "/repos/{}/{}",
            segment(&coordinates.owner),
            segment(&coordinates.name)
        );
        let handle = ResourceHandle::new(client.transport(), path);
        Self {
            client,
            coordinates,
            handle,
        }
    }

    /// Gets the repository coordinates.
    pub fn coordinates(&self) -> &RepoCoordinates {
        &self.coordinates
    }

    /// Gets the client this handle was derived from.
    pub fn github(&self) -> &GitHubClient {
        &self.client
    }

    /// Gets the underlying resource handle.
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Fetches the repository.
    pub async fn fetch(&self) -> GitHubResult<RepoSnapshot> {
        self.handle.fetch_as("repo.fetch").await
    }

    /// Gets the repository's issues.
    pub fn issues(&self) -> Issues {
        Issues::new(self.clone())
    }

    /// Gets the repository's label catalog.
    pub fn labels(&self) -> Labels {
        Labels::new(self.clone())
    }
}

impl PartialEq for Repo {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates
    }
}

impl Eq for Repo {}

impl fmt::Debug for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Repo").field(&self.coordinates.to_string()).finish()
    }
}
