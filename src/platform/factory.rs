//! Gateway factory
//!
//! Creates the pull request gateway from configuration.

use crate::auth::GitHubAuthConfig;
use crate::config::AppConfig;
use crate::error::Result;
use crate::platform::{GitHubGateway, PullRequestGateway};
use std::sync::Arc;

/// Create the GitHub gateway for the configured host
pub fn create_gateway(
    config: &AppConfig,
    auth: &GitHubAuthConfig,
) -> Result<Arc<dyn PullRequestGateway>> {
    let gateway = GitHubGateway::new(&auth.token, config.github_host.as_deref())?;
    Ok(Arc::new(gateway))
}
