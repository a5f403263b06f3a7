//! Repository address parsing from source URLs

use crate::error::{Error, Result};
use crate::types::RepositoryAddress;

/// Parse the `owner/name` pair out of a repository URL
///
/// Accepts scheme URLs (`https://host/owner/repo`, `file:///path/owner/repo.git`),
/// SCP-like SSH remotes (`git@host:owner/repo.git`) and local paths
/// (`/srv/git/owner/repo.git`). The last two
/// non-empty path segments become owner and name; a trailing `.git` is
/// stripped from the name.
pub fn parse_repository_address(url: &str) -> Result<RepositoryAddress> {
    let trimmed = url.trim();
    let path = repository_path(trimmed).ok_or_else(|| invalid(url, "cannot parse URL"))?;

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [.., owner, name] = segments.as_slice() else {
        return Err(invalid(url, "expected at least two path segments (owner/repository)"));
    };

    let name = name.strip_suffix(".git").unwrap_or(*name);
    if name.is_empty() {
        return Err(invalid(url, "repository name is empty"));
    }

    Ok(RepositoryAddress {
        owner: (*owner).to_string(),
        name: name.to_string(),
    })
}

/// Path portion of the URL, with scheme, host, query and fragment removed
fn repository_path(url: &str) -> Option<String> {
    if !url.contains("://") {
        // SCP-like SSH format: [user@]host:owner/repo.git
        if let Some((host, path)) = url.split_once(':') {
            if !host.is_empty() && !host.contains('/') {
                return Some(path.to_string());
            }
        }
        return Some(url.to_string());
    }

    url::Url::parse(url).ok().map(|u| u.path().to_string())
}

fn invalid(url: &str, reason: &str) -> Error {
    Error::InvalidAddress {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
