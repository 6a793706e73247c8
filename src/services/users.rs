//! User operations.

use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use crate::handle::{segment, ResourceHandle};
use crate::types::UserSnapshot;
use std::fmt;

/// Accessor for GitHub users.
#[derive(Debug, Clone)]
pub struct Users {
    client: GitHubClient,
}

impl Users {
    pub(crate) fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Gets the authenticated user.
    pub async fn self_user(&self) -> GitHubResult<User> {
        let me: UserSnapshot = ResourceHandle::new(self.client.transport(), "/user")
            .fetch_as("users.self")
            .await?;
        Ok(self.get(&me.login))
    }

    /// Gets a user handle by login. No request is made.
    pub fn get(&self, login: &str) -> User {
        User::new(&self.client, login)
    }
}

/// Handle to one GitHub user.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct User {
    login: String,
    handle: ResourceHandle,
}

impl User {
    pub(crate) fn new(client: &GitHubClient, login: &str) -> Self {
        Self {
            login: login.to_string(),
            handle: ResourceHandle::new(client.transport(), format!("/users/{}", segment(login))),
        }
    }

    /// Gets the login.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Fetches the user.
    pub async fn fetch(&self) -> GitHubResult<UserSnapshot> {
        self.handle.fetch_as("user.fetch").await
    }

    /// Fetches the display name. Users without one have `None`.
    pub async fn name(&self) -> GitHubResult<Option<String>> {
        Ok(self.fetch().await?.name)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("User").field(&self.login).finish()
    }
}
