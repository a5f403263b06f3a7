//! ticket2pr - Turn a ticket into a pull request
//!
//! Given a repository URL and a ticket description, the pipeline clones the
//! repository into a private scratch directory, creates a short time-salted
//! branch, lets a [`change::ChangeProducer`] materialize the change, commits,
//! pushes to `origin`, and opens a pull request on the host.
//!
//! # Architecture
//!
//! The library is interface-agnostic: the same [`pipeline::TicketPipeline`]
//! backs the CLI and the HTTP endpoint. Git work goes through `git2`, the
//! host API through a [`platform::PullRequestGateway`], and configuration is
//! passed explicitly (no globals).

pub mod auth;
pub mod change;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod repo;
pub mod server;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
