//! Error types for ticket2pr
//!
//! Every pipeline stage has its own variant so a failure can be traced back
//! to the operation and the target (URL, path, branch) it was working on.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by ticket2pr
#[derive(Debug, Error)]
pub enum Error {
    /// The source URL does not name an `owner/repo` pair
    #[error("invalid repository address '{url}': {reason}")]
    InvalidAddress {
        /// URL as supplied by the caller
        url: String,
        /// What was wrong with it
        reason: String,
    },

    /// Cloning the source repository failed
    #[error("failed to clone {url} into {}: {source}", path.display())]
    Clone {
        /// Source URL
        url: String,
        /// Local clone target
        path: PathBuf,
        /// Underlying git failure
        #[source]
        source: git2::Error,
    },

    /// Creating or checking out the ticket branch failed
    #[error("failed to create branch '{branch}' in {}: {reason}", path.display())]
    Branch {
        /// Branch being created
        branch: String,
        /// Workspace path
        path: PathBuf,
        /// Failure description
        reason: String,
    },

    /// The change producer could not materialize its change
    #[error("failed to generate changes in {}: {source}", path.display())]
    Generation {
        /// Workspace path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Staging or committing failed
    #[error("failed to commit in {}: {reason}", path.display())]
    Commit {
        /// Workspace path
        path: PathBuf,
        /// Failure description
        reason: String,
    },

    /// Pushing the branch to `origin` failed
    #[error("failed to push branch '{branch}' to {remote}: {reason}")]
    Push {
        /// Branch being pushed
        branch: String,
        /// Remote name
        remote: String,
        /// Failure description
        reason: String,
    },

    /// The remote host rejected or failed the pull request call
    #[error("pull request gateway error: {0}")]
    Gateway(String),

    /// Required configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication could not be established
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invariant violation inside the crate
    #[error("internal error: {0}")]
    Internal(String),

    /// Filesystem failure outside a pipeline stage
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error should fail a request outright instead of being
    /// reported as an `Error` result.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::Gateway(format!(
                "GitHub responded with {}: {}",
                source.status_code, source.message
            )),
            other => Self::Gateway(other.to_string()),
        }
    }
}
