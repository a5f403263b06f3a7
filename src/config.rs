//! Runtime configuration
//!
//! Everything is read from environment variables. Loading goes through a
//! key lookup function so tests can supply values without touching the
//! process environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Token variables, in priority order
pub const TOKEN_VARS: [&str; 3] = ["TICKET2PR_GITHUB_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

const USE_GH_CLI_VAR: &str = "TICKET2PR_USE_GH_CLI";
const GH_HOST_VAR: &str = "GH_HOST";
const SCRATCH_DIR_VAR: &str = "TICKET2PR_SCRATCH_DIR";
const ADDR_VAR: &str = "TICKET2PR_ADDR";

/// Default bind address for `ticket2pr serve`
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GitHub token from the environment, if any
    pub github_token: Option<String>,
    /// Whether to ask the `gh` CLI for a token when none is set
    pub use_gh_cli: bool,
    /// GitHub Enterprise host (None for github.com)
    pub github_host: Option<String>,
    /// Parent directory for per-request workspaces
    pub scratch_root: PathBuf,
    /// Server bind address
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let github_token = TOKEN_VARS.iter().find_map(|key| non_empty(key));

        let use_gh_cli = match non_empty(USE_GH_CLI_VAR) {
            None => true,
            Some(value) => parse_bool(&value).ok_or_else(|| {
                Error::Config(format!("{USE_GH_CLI_VAR} must be true or false, got '{value}'"))
            })?,
        };

        let github_host = non_empty(GH_HOST_VAR).filter(|h| h != "github.com");

        let scratch_root = non_empty(SCRATCH_DIR_VAR).map_or_else(env::temp_dir, PathBuf::from);

        let addr = non_empty(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let listen_addr = addr.parse().map_err(|e| {
            Error::Config(format!("{ADDR_VAR} is not a socket address ({addr}): {e}"))
        })?;

        Ok(Self {
            github_token,
            use_gh_cli,
            github_host,
            scratch_root,
            listen_addr,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            use_gh_cli: true,
            github_host: None,
            scratch_root: env::temp_dir(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
