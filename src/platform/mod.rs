//! Pull request gateway for the source host
//!
//! The pipeline only needs one remote operation: open a pull request for a
//! pushed branch. [`PullRequestGateway`] abstracts it so tests and other
//! hosts can stand in for GitHub.

mod detection;
mod factory;
mod github;

pub use detection::parse_repository_address;
pub use factory::create_gateway;
pub use github::{pr_body, pr_title, GitHubGateway};

use crate::error::Result;
use crate::types::PullRequest;
use async_trait::async_trait;

/// Remote pull request creation
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Open a pull request from `branch` against the default branch of the
    /// repository that `source_url` points at
    async fn create_pull_request(
        &self,
        source_url: &str,
        branch: &str,
        description: &str,
    ) -> Result<PullRequest>;
}

/// REST API root for a GitHub Enterprise host
pub fn api_base_uri(host: &str) -> String {
    format!("https://{host}/api/v3")
}
