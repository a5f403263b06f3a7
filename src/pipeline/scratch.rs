//! Per-request scratch directories

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of every scratch directory name
pub const SCRATCH_PREFIX: &str = "ticket2pr-";

/// A uniquely named directory removed on [`close`](Self::close) or drop
///
/// The directory itself is not created; the clone creates it. Removal
/// failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    /// Reserve a fresh path under `root`, creating `root` if needed
    pub fn allocate(root: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(root)?;
        let path = root.join(format!("{SCRATCH_PREFIX}{}", Uuid::new_v4()));
        debug!(path = %path.display(), "allocated scratch directory");
        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Reserved path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed scratch directory"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to clean up scratch directory"
            ),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}
