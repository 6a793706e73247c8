//! # GitHub Issues Integration Library
//!
//! A typed GitHub Issues client with:
//! - Issue creation, editing and open/close transitions
//! - Comments, labels and the issue event trail
//! - Lazy pagination that follows `Link` headers page by page
//! - Typed snapshots decoded once per fetch
//! - Errors that keep the HTTP status, the server payload and the failing operation
//! - Tracing and request metrics
//!
//! Handles carry identity only. Every read is a fresh request and every
//! mutation is exactly one request; nothing is cached or retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use integrations_github_issues::GitHubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GitHubClient::builder().pat("ghp_xxxxxxxxxxxx").build()?;
//!     let repo = client.repo("octocat/hello-world")?;
//!
//!     let issue = repo.issues().create("Crash on start", "Steps to reproduce...").await?;
//!     issue.labels().add(["bug"]).await?;
//!     issue.comments().post("Looking into it").await?;
//!     issue.close().await?;
//!
//!     let mut events = issue.events().iterate();
//!     while let Some(event) = events.try_next().await? {
//!         println!("{} {}", event.created_at, event.event);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Authentication
pub mod auth;

// Transport and resource handles
pub mod handle;
pub mod transport;

// Entry point
pub mod client;

// Pagination handling
pub mod pagination;

// Resource accessors
pub mod services;

// Observability
pub mod observability;

// Mocks for testing
pub mod mocks;

// Re-exports for convenience
pub use auth::{AuthManager, AuthMethod};
pub use client::{GitHubClient, GitHubClientBuilder};
pub use config::{GitHubConfig, GitHubConfigBuilder};
pub use errors::{ErrorCategory, GitHubError, GitHubErrorKind, GitHubResult};
pub use handle::ResourceHandle;
pub use pagination::{EnvelopeCursor, LinkHeader, PageLinkConvention, PaginatedCollection, PaginationLinks};
pub use services::*;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
