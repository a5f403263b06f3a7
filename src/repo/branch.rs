//! Branch naming for ticket branches
//!
//! Names are short (some hosts and tools choke on long refs) and salted with
//! the current time so repeated tickets do not collide. Two identical
//! description prefixes within the same second still collide; branch
//! creation reports that as an error rather than overwriting.

use chrono::Utc;
use std::fmt;

/// Maximum branch name length in characters
pub const MAX_BRANCH_LEN: usize = 15;

/// Number of description characters considered for the prefix
const PREFIX_SOURCE_CHARS: usize = 10;

/// Prefix used when the description has no usable characters
const FALLBACK_PREFIX: &str = "ticket";

/// Modulus that keeps the last five digits of the timestamp
const SALT_MODULUS: i64 = 100_000;

/// A validated ticket branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Branch name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full ref name (`refs/heads/<name>`)
    pub fn ref_name(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

/// Generate a branch name for `description`, salted with the current time
pub fn generate_branch_name(description: &str) -> BranchName {
    branch_name_at(description, Utc::now().timestamp())
}

/// Generate a branch name for `description` with an explicit Unix timestamp
pub fn branch_name_at(description: &str, unix_seconds: i64) -> BranchName {
    let mut prefix: String = description
        .chars()
        .take(PREFIX_SOURCE_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if prefix.is_empty() {
        prefix = FALLBACK_PREFIX.to_string();
    }

    let salt = unix_seconds.rem_euclid(SALT_MODULUS);
    let mut name = format!("{prefix}-{salt:05}");
    // ASCII only, so byte truncation is a char truncation
    name.truncate(MAX_BRANCH_LEN);

    BranchName(name)
}
