//! Authentication for the GitHub API.
//!
//! The client never looks credentials up on its own: a token is handed to
//! [`GitHubConfig`](crate::GitHubConfig) by the caller, who is free to read it
//! from wherever they like.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use secrecy::{ExposeSecret, SecretString};

/// Authentication method for GitHub API.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Personal Access Token (classic or fine-grained).
    Pat(SecretString),
    /// OAuth access token.
    OAuth(SecretString),
    /// GitHub Actions token (the workflow's GITHUB_TOKEN).
    Actions(SecretString),
}

impl AuthMethod {
    /// Creates a PAT authentication method.
    pub fn pat(token: impl Into<String>) -> Self {
        Self::Pat(SecretString::new(token.into()))
    }

    /// Creates an OAuth authentication method.
    pub fn oauth(token: impl Into<String>) -> Self {
        Self::OAuth(SecretString::new(token.into()))
    }

    /// Creates a GitHub Actions token authentication method.
    pub fn actions(token: impl Into<String>) -> Self {
        Self::Actions(SecretString::new(token.into()))
    }

    fn secret(&self) -> &SecretString {
        match self {
            Self::Pat(t) | Self::OAuth(t) | Self::Actions(t) => t,
        }
    }

    /// Rejects blank tokens before any request is made.
    pub fn validate(&self) -> GitHubResult<()> {
        let token = self.secret().expose_secret();
        if token.trim().is_empty() {
            return Err(GitHubError::new(
                GitHubErrorKind::InvalidToken,
                "Authentication token cannot be empty",
            ));
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GitHubError::new(
                GitHubErrorKind::InvalidToken,
                "Authentication token contains whitespace or control characters",
            ));
        }
        Ok(())
    }

    /// Gets the token prefix for logging.
    pub fn token_prefix(&self) -> &'static str {
        match self {
            Self::Pat(t) => {
                let exposed = t.expose_secret();
                if exposed.starts_with("ghp_") {
                    "ghp_***"
                } else if exposed.starts_with("github_pat_") {
                    "github_pat_***"
                } else {
                    "***"
                }
            }
            Self::OAuth(_) => "gho_***",
            Self::Actions(_) => "ghs_***",
        }
    }
}

/// Produces the Authorization header for every request.
#[derive(Debug, Clone)]
pub struct AuthManager {
    method: AuthMethod,
}

impl AuthManager {
    /// Creates a new authentication manager from a validated method.
    pub fn new(method: AuthMethod) -> GitHubResult<Self> {
        method.validate()?;
        Ok(Self { method })
    }

    /// Gets the authentication method.
    pub fn method(&self) -> &AuthMethod {
        &self.method
    }

    /// Generates the Authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.method.secret().expose_secret())
    }
}
