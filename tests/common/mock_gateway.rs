//! Mock pull request gateway
//!
//! Resolves the repository address like the real gateway does, records
//! every call and hands out increasing PR numbers. Errors can be injected.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use ticket2pr::error::{Error, Result};
use ticket2pr::platform::{parse_repository_address, pr_title, PullRequestGateway};
use ticket2pr::types::PullRequest;

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub description: String,
}

/// Call-recording gateway
pub struct MockGateway {
    next_pr_number: AtomicU64,
    calls: Mutex<Vec<CreatePrCall>>,
    error: Mutex<Option<String>>,
}

impl MockGateway {
    /// Gateway that succeeds, starting at PR #1
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    /// Gateway that fails every call with `message`
    pub fn failing(message: &str) -> Self {
        let gateway = Self::new();
        *gateway.error.lock().unwrap() = Some(message.to_string());
        gateway
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<CreatePrCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestGateway for MockGateway {
    async fn create_pull_request(
        &self,
        source_url: &str,
        branch: &str,
        description: &str,
    ) -> Result<PullRequest> {
        let address = parse_repository_address(source_url)?;
        self.calls.lock().unwrap().push(CreatePrCall {
            owner: address.owner.clone(),
            name: address.name.clone(),
            branch: branch.to_string(),
            description: description.to_string(),
        });

        if let Some(message) = self.error.lock().unwrap().clone() {
            return Err(Error::Gateway(message));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{address}/pull/{number}"),
            base_ref: "main".to_string(),
            head_ref: branch.to_string(),
            title: pr_title(description),
        })
    }
}
