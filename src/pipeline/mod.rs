//! Ticket pipeline
//!
//! Orchestrates the clone, branch, generate, commit, push and pull request
//! stages for one ticket, with per-request scratch space and progress
//! reporting.

mod execute;
mod progress;
mod scratch;

pub use execute::{commit_message, TicketPipeline};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use scratch::{ScratchDir, SCRATCH_PREFIX};
