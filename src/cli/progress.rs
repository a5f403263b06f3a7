//! Spinner-based progress for `ticket2pr run`

use crate::cli::style::{check, cross, spinner_style, Stylize};
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;
use ticket2pr::error::Error;
use ticket2pr::pipeline::{Phase, ProgressCallback};
use ticket2pr::types::PipelineResult;

/// Renders pipeline phases on stderr
///
/// The running phase is shown on a spinner; finished phases are printed
/// above it with a checkmark.
pub struct CliProgress {
    spinner: ProgressBar,
    current: Mutex<Option<Phase>>,
}

impl CliProgress {
    /// Start a spinner on stderr
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner,
            current: Mutex::new(None),
        }
    }

    fn take_current(&self) -> Option<Phase> {
        self.current.lock().ok().and_then(|mut c| c.take())
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        if let Some(done) = self.take_current() {
            self.spinner
                .println(format!("{} {done}", check().for_stderr()));
        }

        if phase == Phase::Done {
            self.spinner.finish_and_clear();
            return;
        }

        if let Ok(mut current) = self.current.lock() {
            *current = Some(phase);
        }
        self.spinner.set_message(format!("{phase}..."));
    }

    async fn on_message(&self, message: &str) {
        self.spinner
            .println(format!("  {}", message.muted().for_stderr()));
    }

    async fn on_error(&self, error: &Error) {
        let failed = self.take_current();
        let label = failed.map_or_else(|| "Pipeline".to_string(), |p| p.to_string());
        self.spinner
            .println(format!("{} {label}: {}", cross(), error.error()));
    }

    async fn on_complete(&self, _result: &PipelineResult) {
        self.spinner.finish_and_clear();
    }
}
