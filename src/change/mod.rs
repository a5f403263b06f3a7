//! Change producers
//!
//! A [`ChangeProducer`] turns a ticket into edits inside a cloned
//! workspace. The pipeline only relies on "some diff exists afterwards";
//! which files are touched is entirely up to the producer.

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tracing::info;

/// File written by [`ImplementationNote`]
pub const IMPLEMENTATION_FILE: &str = "IMPLEMENTATION.md";

/// Materializes the change requested by a ticket
#[async_trait]
pub trait ChangeProducer: Send + Sync {
    /// Apply the change for `description` inside `workspace`
    async fn apply(&self, workspace: &Path, description: &str) -> Result<()>;
}

/// Placeholder producer that records the ticket in `IMPLEMENTATION.md`
///
/// Stands in for a real code generator until one is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplementationNote;

impl ImplementationNote {
    /// Render the note for `description` stamped with `generated_at`
    pub fn render(description: &str, generated_at: &str) -> String {
        format!(
            "# Implementation for Ticket\n\
             \n\
             ## Ticket Description\n\
             {description}\n\
             \n\
             ## Changes Made\n\
             This file represents the implementation of the requested ticket.\n\
             A code generation backend would replace it with actual changes\n\
             derived from the ticket description.\n\
             \n\
             ## Timestamp\n\
             Generated at: {generated_at} UTC\n"
        )
    }
}

#[async_trait]
impl ChangeProducer for ImplementationNote {
    async fn apply(&self, workspace: &Path, description: &str) -> Result<()> {
        let target = workspace.join(IMPLEMENTATION_FILE);
        let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        tokio::fs::write(&target, Self::render(description, &generated_at))
            .await
            .map_err(|source| Error::Generation {
                path: workspace.to_path_buf(),
                source,
            })?;

        info!(file = %target.display(), "wrote implementation note");
        Ok(())
    }
}
