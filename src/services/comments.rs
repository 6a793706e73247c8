//! Issue comments.

use crate::errors::GitHubResult;
use crate::handle::ResourceHandle;
use crate::pagination::PaginatedCollection;
use crate::services::{Issue, User};
use crate::transport::decode_value;
use crate::types::CommentSnapshot;
use futures::stream::BoxStream;
use reqwest::Method;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// The comments of one issue, in creation order.
#[derive(Debug, Clone)]
pub struct Comments {
    issue: Issue,
    handle: ResourceHandle,
}

impl Comments {
    pub(crate) fn new(issue: Issue) -> Self {
        let handle = issue.handle().child("comments");
        Self { issue, handle }
    }

    /// Posts a comment as the authenticated user.
    pub async fn post(&self, body: &str) -> GitHubResult<Comment> {
        let created: CommentSnapshot = self
            .handle
            .send_json("comments.post", Method::POST, &CommentBody { body })
            .await?;
        Ok(self.get(created.id))
    }

    /// Gets a comment handle by id. No request is made.
    pub fn get(&self, id: u64) -> Comment {
        Comment::new(self.issue.clone(), id)
    }

    /// Lists the comments.
    pub fn collection(&self) -> PaginatedCollection<Comment> {
        let issue = self.issue.clone();
        self.issue
            .repo()
            .github()
            .collection(self.handle.path(), move |item| {
                let snapshot: CommentSnapshot = decode_value(item)?;
                Ok(Comment::new(issue.clone(), snapshot.id))
            })
    }

    /// Streams the comments.
    pub fn iterate(&self) -> BoxStream<'static, GitHubResult<Comment>> {
        self.collection().iterate()
    }
}

/// Handle to one issue comment.
#[derive(Clone)]
pub struct Comment {
    issue: Issue,
    id: u64,
    handle: ResourceHandle,
}

impl Comment {
    pub(crate) fn new(issue: Issue, id: u64) -> Self {
        // comments are addressed per repository, not per issue
        let handle = issue
            .repo()
            .handle()
            .child(&format!("issues/comments/{}", id));
        Self { issue, id, handle }
    }

    /// Gets the comment id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the issue the comment belongs to.
    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    /// Fetches the comment.
    pub async fn fetch(&self) -> GitHubResult<CommentSnapshot> {
        self.handle.fetch_as("comment.fetch").await
    }

    /// Fetches the body.
    pub async fn body(&self) -> GitHubResult<String> {
        Ok(self.fetch().await?.body)
    }

    /// Replaces the body.
    pub async fn set_body(&self, body: &str) -> GitHubResult<()> {
        self.handle
            .send_json::<_, CommentSnapshot>("comment.set_body", Method::PATCH, &CommentBody { body })
            .await
            .map(drop)
    }

    /// Fetches the author.
    pub async fn author(&self) -> GitHubResult<User> {
        let snapshot = self.fetch().await?;
        Ok(User::new(self.issue.repo().github(), &snapshot.user.login))
    }

    /// Deletes the comment. Removing it again fails with not found.
    pub async fn remove(&self) -> GitHubResult<()> {
        self.handle
            .send("comment.remove", Method::DELETE, None)
            .await
            .map(drop)
    }
}

impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.issue == other.issue && self.id == other.id
    }
}

impl Eq for Comment {}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comment")
            .field("issue", &self.issue)
            .field("id", &self.id)
            .finish()
    }
}
