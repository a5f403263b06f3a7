//! Pipeline execution
//!
//! Runs one ticket through clone, branch, generate, commit, push and pull
//! request creation. The first failing stage aborts the run; the scratch
//! directory is removed on every exit path before the result is returned.

use crate::auth::{get_github_auth, CredentialProvider, TokenCredentials};
use crate::change::{ChangeProducer, ImplementationNote};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::pipeline::scratch::ScratchDir;
use crate::pipeline::{NoopProgress, Phase, ProgressCallback};
use crate::platform::{create_gateway, PullRequestGateway};
use crate::repo::{BranchName, GitWorkspace};
use crate::types::{PipelineResult, PullRequest, TicketRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Ticket-to-pull-request pipeline
///
/// Holds only immutable collaborators, so one instance can serve any number
/// of concurrent requests; each run gets its own scratch directory.
pub struct TicketPipeline {
    gateway: Arc<dyn PullRequestGateway>,
    producer: Arc<dyn ChangeProducer>,
    credentials: Arc<dyn CredentialProvider>,
    scratch_root: PathBuf,
}

impl TicketPipeline {
    /// Assemble a pipeline from its collaborators
    pub fn new(
        gateway: Arc<dyn PullRequestGateway>,
        producer: Arc<dyn ChangeProducer>,
        credentials: Arc<dyn CredentialProvider>,
        scratch_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            gateway,
            producer,
            credentials,
            scratch_root: scratch_root.into(),
        }
    }

    /// Build the production pipeline from configuration
    ///
    /// Fails with [`Error::Config`] when no GitHub token is available, before
    /// any git work happens.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let auth = get_github_auth(config).await?;
        info!(source = ?auth.source, "resolved GitHub token");

        let gateway = create_gateway(config, &auth)?;
        let credentials = Arc::new(TokenCredentials::new(auth.token));

        Ok(Self::new(
            gateway,
            Arc::new(ImplementationNote),
            credentials,
            config.scratch_root.clone(),
        ))
    }

    /// Process a ticket without progress reporting
    pub async fn process(&self, request: &TicketRequest) -> PipelineResult {
        self.process_with_progress(request, &NoopProgress).await
    }

    /// Process a ticket, reporting phases to `progress`
    #[tracing::instrument(skip_all, fields(source_url = %request.source_url))]
    pub async fn process_with_progress(
        &self,
        request: &TicketRequest,
        progress: &dyn ProgressCallback,
    ) -> PipelineResult {
        let mut run = PipelineRun::new(progress);

        let outcome = match ScratchDir::allocate(&self.scratch_root) {
            Ok(scratch) => {
                let outcome = self.run_stages(request, scratch.path(), &mut run).await;
                scratch.close();
                outcome
            }
            Err(e) => Err(Error::Io(e)),
        };

        let result = match outcome {
            Ok((branch, pr)) => {
                info!(%branch, url = %pr.html_url, "ticket processed");
                PipelineResult::success(branch, pr.html_url)
            }
            Err(err) => {
                error!(phase = %run.phase, error = %err, "ticket processing failed");
                progress.on_error(&err).await;
                PipelineResult::failure(err.to_string())
            }
        };

        run.finish().await;
        progress.on_complete(&result).await;
        result
    }

    async fn run_stages(
        &self,
        request: &TicketRequest,
        path: &Path,
        run: &mut PipelineRun<'_>,
    ) -> Result<(BranchName, PullRequest)> {
        run.enter(Phase::Cloning).await?;
        let workspace = {
            let url = request.source_url.clone();
            let path = path.to_path_buf();
            let credentials = Arc::clone(&self.credentials);
            blocking(move || {
                GitWorkspace::clone_repository(&url, &path, Some(credentials.as_ref()))
            })
            .await?
        };

        run.enter(Phase::Branching).await?;
        let branch = {
            let workspace = workspace.clone();
            let description = request.description.clone();
            blocking(move || workspace.create_and_checkout_branch(&description)).await?
        };
        run.progress
            .on_message(&format!("Created branch {branch}"))
            .await;

        run.enter(Phase::Generating).await?;
        self.producer
            .apply(workspace.path(), &request.description)
            .await?;

        run.enter(Phase::Committing).await?;
        {
            let workspace = workspace.clone();
            let message = commit_message(&request.description);
            blocking(move || workspace.commit_all(&message)).await?;
        }

        run.enter(Phase::Pushing).await?;
        {
            let workspace = workspace.clone();
            let branch = branch.clone();
            let credentials = Arc::clone(&self.credentials);
            blocking(move || workspace.push(&branch, credentials.as_ref())).await?;
        }

        run.enter(Phase::CreatingPr).await?;
        let pr = self
            .gateway
            .create_pull_request(&request.source_url, branch.as_str(), &request.description)
            .await?;

        Ok((branch, pr))
    }
}

/// Commit message for a ticket
pub fn commit_message(description: &str) -> String {
    format!("Implement: {description}")
}

/// State of a single run
struct PipelineRun<'a> {
    phase: Phase,
    progress: &'a dyn ProgressCallback,
}

impl<'a> PipelineRun<'a> {
    const fn new(progress: &'a dyn ProgressCallback) -> Self {
        Self {
            phase: Phase::Idle,
            progress,
        }
    }

    async fn enter(&mut self, next: Phase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(Error::Internal(format!(
                "invalid pipeline transition {:?} -> {next:?}",
                self.phase
            )));
        }
        info!(phase = %next, "entering phase");
        self.phase = next;
        self.progress.on_phase(next).await;
        Ok(())
    }

    async fn finish(&mut self) {
        if self.phase != Phase::Done {
            self.phase = Phase::Done;
            self.progress.on_phase(Phase::Done).await;
        }
    }
}

/// Run blocking git work off the async executor
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("git worker failed: {e}")))?
}
