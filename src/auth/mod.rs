//! Authentication for GitHub and git transports
//!
//! Token lookup supports environment variables and the `gh` CLI. Git
//! transport credentials are handed out by a [`CredentialProvider`] so the
//! workspace never needs to know which scheme is in use.

mod github;

pub use github::{get_github_auth, test_github_auth, GitHubAuthConfig};

use git2::{Cred, CredentialType};
use std::fmt;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from CLI tool (gh)
    Cli,
    /// Token from environment variable
    EnvVar,
}

/// Supplies credentials to git transports
pub trait CredentialProvider: Send + Sync {
    /// Produce a credential for `url`, restricted to the `allowed` kinds
    fn credentials(
        &self,
        url: &str,
        username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error>;
}

/// Token-as-username credentials with an empty password
///
/// This is the scheme GitHub accepts for HTTPS pushes with a personal
/// access token.
#[derive(Clone)]
pub struct TokenCredentials {
    token: String,
}

impl TokenCredentials {
    /// Wrap a token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for TokenCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCredentials")
            .field("token", &"***")
            .finish()
    }
}

impl CredentialProvider for TokenCredentials {
    fn credentials(
        &self,
        url: &str,
        _username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error> {
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            Cred::userpass_plaintext(&self.token, "")
        } else {
            Err(git2::Error::from_str(&format!(
                "{url} does not accept token credentials (allowed: {allowed:?})"
            )))
        }
    }
}
