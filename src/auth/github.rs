//! GitHub authentication

use crate::auth::AuthSource;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::platform::api_base_uri;
use tokio::process::Command;
use tracing::debug;

/// GitHub authentication configuration
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"***")
            .field("source", &self.source)
            .finish()
    }
}

/// Get GitHub authentication
///
/// Priority:
/// 1. `TICKET2PR_GITHUB_TOKEN`, `GITHUB_TOKEN`, `GH_TOKEN` (already resolved
///    into the config)
/// 2. gh CLI (`gh auth token`), unless disabled
///
/// A missing token is a configuration error.
pub async fn get_github_auth(config: &AppConfig) -> Result<GitHubAuthConfig> {
    if let Some(token) = &config.github_token {
        return Ok(GitHubAuthConfig {
            token: token.clone(),
            source: AuthSource::EnvVar,
        });
    }

    if config.use_gh_cli {
        if let Some(token) = get_gh_cli_token(config.github_host.as_deref()).await {
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::Cli,
            });
        }
    }

    Err(Error::Config(
        "No GitHub token configured. Set GITHUB_TOKEN (or TICKET2PR_GITHUB_TOKEN) or run `gh auth login`"
            .to_string(),
    ))
}

async fn get_gh_cli_token(host: Option<&str>) -> Option<String> {
    let mut args = vec!["auth", "token"];
    if let Some(h) = host {
        args.extend(["--hostname", h]);
    }

    let output = Command::new("gh").args(&args).output().await.ok()?;

    if !output.status.success() {
        debug!("gh CLI did not return a token");
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Test GitHub authentication, returning the login of the token's owner
pub async fn test_github_auth(auth: &GitHubAuthConfig, host: Option<&str>) -> Result<String> {
    let mut builder = octocrab::Octocrab::builder().personal_token(auth.token.clone());

    if let Some(h) = host {
        builder = builder
            .base_uri(api_base_uri(h))
            .map_err(|e| Error::Config(format!("invalid GitHub host '{h}': {e}")))?;
    }

    let octocrab = builder.build().map_err(|e| Error::Gateway(e.to_string()))?;

    let user = octocrab
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?;

    Ok(user.login)
}
