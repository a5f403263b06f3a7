//! GitHub gateway implementation

use crate::error::{Error, Result};
use crate::platform::{api_base_uri, parse_repository_address, PullRequestGateway};
use crate::types::{PullRequest, RepositoryAddress};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::{debug, info};

/// Longest title GitHub lists without truncation
const MAX_TITLE_CHARS: usize = 72;

/// Branch used when the repository payload omits `default_branch`
const FALLBACK_BASE_BRANCH: &str = "main";

/// GitHub gateway using octocrab
pub struct GitHubGateway {
    client: Octocrab,
}

impl GitHubGateway {
    /// Create a gateway for github.com or a GitHub Enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        match host {
            Some(h) => Self::with_base_uri(token, &api_base_uri(h)),
            None => {
                let client = Octocrab::builder()
                    .personal_token(token.to_string())
                    .build()
                    .map_err(|e| Error::Gateway(e.to_string()))?;
                Ok(Self { client })
            }
        }
    }

    /// Create a gateway against an explicit API root
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)
            .map_err(|e| Error::Config(format!("invalid GitHub API base '{base_uri}': {e}")))?
            .build()
            .map_err(|e| Error::Gateway(e.to_string()))?;

        Ok(Self { client })
    }

    async fn default_branch(&self, repo: &RepositoryAddress) -> Result<String> {
        let info = self.client.repos(&repo.owner, &repo.name).get().await?;

        Ok(info
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| FALLBACK_BASE_BRANCH.to_string()))
    }
}

#[async_trait]
impl PullRequestGateway for GitHubGateway {
    async fn create_pull_request(
        &self,
        source_url: &str,
        branch: &str,
        description: &str,
    ) -> Result<PullRequest> {
        let repo = parse_repository_address(source_url)?;
        let base = self.default_branch(&repo).await?;
        debug!(%repo, %base, "resolved default branch");

        let title = pr_title(description);
        let pr = self
            .client
            .pulls(&repo.owner, &repo.name)
            .create(&title, branch, &base)
            .body(pr_body(description))
            .send()
            .await?;

        let html_url = pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        info!(%repo, number = pr.number, url = %html_url, "opened pull request");

        Ok(PullRequest {
            number: pr.number,
            html_url,
            base_ref: pr.base.ref_field.clone(),
            head_ref: pr.head.ref_field.clone(),
            title: pr.title.clone().unwrap_or(title),
        })
    }
}

/// Pull request title for a ticket: `Implement: <first line>`
pub fn pr_title(description: &str) -> String {
    let first_line = description.lines().map(str::trim).find(|l| !l.is_empty());
    let Some(first_line) = first_line else {
        return "Implement ticket".to_string();
    };

    let title = format!("Implement: {first_line}");
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title;
    }

    let mut truncated: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Pull request body for a ticket
pub fn pr_body(description: &str) -> String {
    format!(
        "## Ticket\n\n{}\n\n---\nThis pull request was generated by ticket2pr.",
        description.trim()
    )
}
