//! Local git fixtures
//!
//! An [`OriginRepo`] is a bare repository laid out as `<tmp>/acme/widgets.git`
//! so its path parses to the `acme/widgets` address, seeded with one commit
//! on its default branch. Pipelines clone from and push back to it.

use git2::{IndexAddOption, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bare "origin" repository plus a scratch root for pipeline workspaces
pub struct OriginRepo {
    dir: TempDir,
    path: PathBuf,
}

impl OriginRepo {
    /// Create an origin whose default branch holds a README
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed");
        let path = dir.path().join("acme").join("widgets.git");

        let repo = Repository::init(&seed).unwrap();
        fs::write(seed.join("README.md"), "# widgets\n").unwrap();
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("seed", "seed@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let bare = Repository::init_bare(&path).unwrap();
        let head_ref = repo.head().unwrap().name().unwrap().to_string();
        let mut remote = repo.remote("origin", path.to_str().unwrap()).unwrap();
        let refspec = format!("{head_ref}:{head_ref}");
        remote.push(&[refspec.as_str()], None).unwrap();
        bare.set_head(&head_ref).unwrap();

        Self { dir, path }
    }

    /// Clone URL as a plain filesystem path
    pub fn url(&self) -> String {
        self.path.to_str().unwrap().to_string()
    }

    /// Clone URL with a `file://` scheme
    pub fn file_url(&self) -> String {
        format!("file://{}", self.url())
    }

    /// Directory to use as the pipeline's scratch root
    pub fn scratch_root(&self) -> PathBuf {
        self.dir.path().join("scratch")
    }

    /// Entries left under the scratch root
    pub fn scratch_entries(&self) -> usize {
        fs::read_dir(self.scratch_root()).map_or(0, Iterator::count)
    }

    /// Path of the bare repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `branch` exists on the origin
    pub fn has_branch(&self, branch: &str) -> bool {
        let repo = Repository::open_bare(&self.path).unwrap();
        repo.find_reference(&format!("refs/heads/{branch}")).is_ok()
    }

    /// Content of `file` at the tip of `branch`
    pub fn read_file(&self, branch: &str, file: &str) -> Option<String> {
        let repo = Repository::open_bare(&self.path).ok()?;
        let commit = repo
            .find_reference(&format!("refs/heads/{branch}"))
            .ok()?
            .peel_to_commit()
            .ok()?;
        let entry = commit.tree().ok()?.get_path(Path::new(file)).ok()?;
        let blob = repo.find_blob(entry.id()).ok()?;
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }

    /// Message and author of the commit at the tip of `branch`
    pub fn tip(&self, branch: &str) -> (String, String, String) {
        let repo = Repository::open_bare(&self.path).unwrap();
        let commit = repo
            .find_reference(&format!("refs/heads/{branch}"))
            .unwrap()
            .peel_to_commit()
            .unwrap();
        let author = commit.author();
        (
            commit.message().unwrap_or_default().to_string(),
            author.name().unwrap_or_default().to_string(),
            author.email().unwrap_or_default().to_string(),
        )
    }
}
