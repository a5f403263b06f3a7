//! Pipeline phases and progress reporting
//!
//! The phase enum doubles as the pipeline state machine: a run moves
//! strictly forward through the phases and may jump to [`Phase::Done`] from
//! anywhere. [`ProgressCallback`] lets different interfaces (CLI, web
//! server) observe a run without the pipeline knowing about them.

use crate::error::Error;
use crate::types::PipelineResult;
use async_trait::async_trait;
use std::fmt;

/// Pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Nothing started yet
    Idle,
    /// Cloning the source repository
    Cloning,
    /// Creating the ticket branch
    Branching,
    /// Running the change producer
    Generating,
    /// Committing the change
    Committing,
    /// Pushing the branch to origin
    Pushing,
    /// Opening the pull request
    CreatingPr,
    /// Run finished, successfully or not
    Done,
}

impl Phase {
    /// The phase that follows this one on the success path
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Cloning),
            Self::Cloning => Some(Self::Branching),
            Self::Branching => Some(Self::Generating),
            Self::Generating => Some(Self::Committing),
            Self::Committing => Some(Self::Pushing),
            Self::Pushing => Some(Self::CreatingPr),
            Self::CreatingPr => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether a run in this phase may move to `target`
    pub fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Done => false,
            _ => target == Self::Done || self.next() == Some(target),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Waiting",
            Self::Cloning => "Cloning repository",
            Self::Branching => "Creating branch",
            Self::Generating => "Generating changes",
            Self::Committing => "Committing",
            Self::Pushing => "Pushing branch",
            Self::CreatingPr => "Opening pull request",
            Self::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during a pipeline run.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called with a general status message
    async fn on_message(&self, message: &str);

    /// Called when a stage fails, before the run finishes
    async fn on_error(&self, error: &Error);

    /// Called once with the terminal result
    async fn on_complete(&self, result: &PipelineResult);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_complete(&self, _result: &PipelineResult) {}
}
