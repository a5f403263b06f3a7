//! Core types for ticket2pr

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticket to turn into a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    /// Clone URL of the source repository
    #[serde(alias = "gitHubUrl", alias = "githubUrl")]
    pub source_url: String,
    /// Natural-language description of the requested change
    #[serde(alias = "ticketDescription")]
    pub description: String,
}

impl TicketRequest {
    /// Create a request from its parts
    pub fn new(source_url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            description: description.into(),
        }
    }
}

/// Repository coordinates on the source host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryAddress {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name, without any `.git` suffix
    pub name: String,
}

impl fmt::Display for RepositoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A pull request opened on the remote host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Terminal status of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    /// A pull request was opened
    Success,
    /// A stage failed; see the message
    Error,
}

/// Outcome of processing one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Branch that was pushed (empty on error)
    pub branch_name: String,
    /// URL of the opened pull request (empty on error)
    pub pull_request_url: String,
    /// Success or Error
    pub status: PipelineStatus,
    /// Human-readable outcome
    pub message: String,
}

impl PipelineResult {
    /// Result for a run that opened a pull request
    pub fn success(branch_name: impl Into<String>, pull_request_url: impl Into<String>) -> Self {
        Self {
            branch_name: branch_name.into(),
            pull_request_url: pull_request_url.into(),
            status: PipelineStatus::Success,
            message: "Pull request created successfully".to_string(),
        }
    }

    /// Result for a run aborted by a stage failure
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            branch_name: String::new(),
            pull_request_url: String::new(),
            status: PipelineStatus::Error,
            message: message.into(),
        }
    }

    /// Whether the run opened a pull request
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}
