//! Local git workspace for one ticket
//!
//! Wraps a clone on disk and the handful of git operations the pipeline
//! performs on it. Every operation reopens the repository from the path, so
//! a [`GitWorkspace`] is a cheap handle that can be moved onto a blocking
//! worker. Nothing here reads or writes global git configuration.

mod branch;

pub use branch::{branch_name_at, generate_branch_name, BranchName, MAX_BRANCH_LEN};

use crate::auth::CredentialProvider;
use crate::error::{Error, Result};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    BranchType, ErrorCode, FetchOptions, IndexAddOption, PushOptions, RemoteCallbacks,
    Repository, Signature,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Remote that branches are pushed to
pub const ORIGIN: &str = "origin";

/// Author and committer name for ticket commits
pub const BOT_NAME: &str = "Ticket2PR Bot";

/// Author and committer email for ticket commits
pub const BOT_EMAIL: &str = "ticket2pr@example.com";

/// libgit2 keeps asking for credentials after a rejection; give up after this
const MAX_CREDENTIAL_ATTEMPTS: u32 = 1;

/// A local clone owned by one pipeline run
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    path: PathBuf,
}

impl GitWorkspace {
    /// Handle for an existing clone at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Clone `url` into `path`
    ///
    /// Anything already at `path` is removed first.
    pub fn clone_repository(
        url: &str,
        path: &Path,
        credentials: Option<&dyn CredentialProvider>,
    ) -> Result<Self> {
        let clone_err = |source: git2::Error| Error::Clone {
            url: url.to_string(),
            path: path.to_path_buf(),
            source,
        };

        if path.exists() {
            debug!(path = %path.display(), "removing stale clone target");
            fs::remove_dir_all(path).map_err(|e| {
                clone_err(git2::Error::from_str(&format!(
                    "cannot reset existing directory: {e}"
                )))
            })?;
        }

        info!(%url, path = %path.display(), "cloning repository");

        let mut builder = RepoBuilder::new();
        if let Some(provider) = credentials {
            let mut fetch = FetchOptions::new();
            fetch.remote_callbacks(credential_callbacks(provider));
            builder.fetch_options(fetch);
        }
        builder.clone(url, path).map_err(clone_err)?;

        Ok(Self::open(path))
    }

    /// Path of the working tree
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn repo(&self) -> std::result::Result<Repository, git2::Error> {
        Repository::open(&self.path)
    }

    /// Create a ticket branch from HEAD and check it out
    pub fn create_and_checkout_branch(&self, description: &str) -> Result<BranchName> {
        let branch = generate_branch_name(description);
        self.checkout_new_branch(&branch)?;
        Ok(branch)
    }

    /// Create `branch` from HEAD and check it out
    ///
    /// Fails if a local branch with that name already exists.
    pub fn checkout_new_branch(&self, branch: &BranchName) -> Result<()> {
        let branch_err = |reason: String| Error::Branch {
            branch: branch.to_string(),
            path: self.path.clone(),
            reason,
        };

        let repo = self.repo().map_err(|e| branch_err(e.message().to_string()))?;

        if repo.find_branch(branch.as_str(), BranchType::Local).is_ok() {
            return Err(branch_err("branch already exists".to_string()));
        }

        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| branch_err(format!("cannot resolve HEAD: {}", e.message())))?;

        repo.branch(branch.as_str(), &head, false).map_err(|e| {
            if e.code() == ErrorCode::Exists {
                branch_err("branch already exists".to_string())
            } else {
                branch_err(e.message().to_string())
            }
        })?;

        repo.set_head(&branch.ref_name())
            .and_then(|()| repo.checkout_head(Some(CheckoutBuilder::new().safe())))
            .map_err(|e| branch_err(format!("checkout failed: {}", e.message())))?;

        info!(%branch, path = %self.path.display(), "created and checked out branch");
        Ok(())
    }

    /// Name of the checked-out branch, if HEAD is on one
    pub fn current_branch(&self) -> Option<String> {
        let repo = self.repo().ok()?;
        let head = repo.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(ToString::to_string)
        } else {
            None
        }
    }

    /// Stage every change in the working tree and commit it as the bot
    ///
    /// Returns the new commit id. An unchanged tree is an error: empty
    /// commits are never created.
    pub fn commit_all(&self, message: &str) -> Result<String> {
        let commit_err = |reason: String| Error::Commit {
            path: self.path.clone(),
            reason,
        };
        let git_err = |e: git2::Error| commit_err(e.message().to_string());

        let repo = self.repo().map_err(git_err)?;

        if repo.head_detached().map_err(git_err)? {
            return Err(commit_err("HEAD is detached".to_string()));
        }

        let parent = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| commit_err(format!("cannot resolve HEAD: {}", e.message())))?;

        let mut index = repo.index().map_err(git_err)?;
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .map_err(git_err)?;
        index.update_all(["*"].iter(), None).map_err(git_err)?;
        index.write().map_err(git_err)?;

        let tree_id = index.write_tree().map_err(git_err)?;
        if tree_id == parent.tree_id() {
            return Err(commit_err("nothing to commit".to_string()));
        }

        let tree = repo.find_tree(tree_id).map_err(git_err)?;
        let signature = Signature::now(BOT_NAME, BOT_EMAIL).map_err(git_err)?;
        let oid = repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &[&parent],
            )
            .map_err(git_err)?;

        info!(commit = %oid, path = %self.path.display(), "committed changes");
        Ok(oid.to_string())
    }

    /// Push `branch` to `origin`
    pub fn push(&self, branch: &BranchName, credentials: &dyn CredentialProvider) -> Result<()> {
        let push_err = |reason: String| Error::Push {
            branch: branch.to_string(),
            remote: ORIGIN.to_string(),
            reason,
        };

        let repo = self.repo().map_err(|e| push_err(e.message().to_string()))?;
        let mut remote = repo
            .find_remote(ORIGIN)
            .map_err(|e| push_err(e.message().to_string()))?;

        info!(%branch, remote = ORIGIN, "pushing branch");

        let refspec = format!("{0}:{0}", branch.ref_name());
        let mut rejection: Option<String> = None;
        let pushed = {
            let mut callbacks = credential_callbacks(credentials);
            callbacks.push_update_reference(|refname, status| {
                if let Some(msg) = status {
                    rejection = Some(format!("{refname} rejected: {msg}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote.push(&[refspec.as_str()], Some(&mut options))
        };

        pushed.map_err(|e| push_err(e.message().to_string()))?;
        if let Some(reason) = rejection {
            return Err(push_err(reason));
        }

        Ok(())
    }
}

/// Remote callbacks that answer credential requests from `provider`
fn credential_callbacks(provider: &dyn CredentialProvider) -> RemoteCallbacks<'_> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("credentials rejected by remote"));
        }
        provider.credentials(url, username, allowed)
    });
    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCredentials;
    use tempfile::TempDir;

    /// Bare "origin" with one commit on main, plus a scratch area
    struct Fixture {
        _dir: TempDir,
        origin: PathBuf,
        scratch: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let seed = dir.path().join("seed");
            let origin = dir.path().join("acme").join("widgets.git");

            let repo = Repository::init(&seed).unwrap();
            fs::write(seed.join("README.md"), "# widgets\n").unwrap();
            let mut index = repo.index().unwrap();
            index
                .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
                .unwrap();
            index.write().unwrap();
            let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
            let sig = Signature::now("test", "test@test.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
                .unwrap();

            let bare = Repository::init_bare(&origin).unwrap();
            let head_ref = repo.head().unwrap().name().unwrap().to_string();
            let mut remote = repo.remote("origin", origin.to_str().unwrap()).unwrap();
            let refspec = format!("{head_ref}:{head_ref}");
            remote.push(&[refspec.as_str()], None).unwrap();
            bare.set_head(&head_ref).unwrap();

            let scratch = dir.path().join("scratch");
            Self {
                _dir: dir,
                origin,
                scratch,
            }
        }

        fn url(&self) -> String {
            self.origin.to_str().unwrap().to_string()
        }
    }

    fn creds() -> TokenCredentials {
        TokenCredentials::new("test-token")
    }

    #[test]
    fn test_clone_checks_out_origin() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        assert!(ws.path().join("README.md").exists());
        assert!(ws.current_branch().is_some());
    }

    #[test]
    fn test_second_clone_resets_directory() {
        let fx = Fixture::new();
        GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        fs::write(fx.scratch.join("stale.txt"), "left over").unwrap();

        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        assert!(!ws.path().join("stale.txt").exists());
        assert!(ws.path().join("README.md").exists());
    }

    #[test]
    fn test_clone_replaces_non_repository_directory() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.scratch.join("junk")).unwrap();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        assert!(!ws.path().join("junk").exists());
    }

    #[test]
    fn test_clone_missing_source_fails() {
        let fx = Fixture::new();
        let missing = fx.origin.with_file_name("missing.git");
        let err = GitWorkspace::clone_repository(missing.to_str().unwrap(), &fx.scratch, None)
            .unwrap_err();
        assert!(matches!(err, Error::Clone { .. }), "{err:?}");
    }

    #[test]
    fn test_create_and_checkout_branch() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let branch = ws.create_and_checkout_branch("Fix login bug").unwrap();
        assert!(branch.as_str().starts_with("fixlogin-"));
        assert_eq!(ws.current_branch().as_deref(), Some(branch.as_str()));
    }

    #[test]
    fn test_existing_branch_is_error() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let branch = branch_name_at("Fix login bug", 1_700_012_345);
        ws.checkout_new_branch(&branch).unwrap();

        let err = ws.checkout_new_branch(&branch).unwrap_err();
        assert!(matches!(err, Error::Branch { .. }));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_commit_all_uses_bot_identity() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        ws.create_and_checkout_branch("docs").unwrap();
        fs::create_dir_all(ws.path().join("docs/nested")).unwrap();
        fs::write(ws.path().join("docs/nested/NOTE.md"), "note").unwrap();
        fs::write(ws.path().join("README.md"), "# widgets v2\n").unwrap();

        let sha = ws.commit_all("Implement: docs").unwrap();

        let repo = Repository::open(ws.path()).unwrap();
        let commit = repo.find_commit(git2::Oid::from_str(&sha).unwrap()).unwrap();
        assert_eq!(commit.author().name(), Some(BOT_NAME));
        assert_eq!(commit.committer().email(), Some(BOT_EMAIL));
        assert_eq!(commit.message(), Some("Implement: docs"));
        let tree = commit.tree().unwrap();
        assert!(tree.get_path(Path::new("docs/nested/NOTE.md")).is_ok());
        assert!(repo.statuses(None).unwrap().is_empty());
    }

    #[test]
    fn test_commit_all_stages_deletions() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        fs::remove_file(ws.path().join("README.md")).unwrap();

        let sha = ws.commit_all("remove readme").unwrap();

        let repo = Repository::open(ws.path()).unwrap();
        let commit = repo.find_commit(git2::Oid::from_str(&sha).unwrap()).unwrap();
        assert!(commit.tree().unwrap().get_path(Path::new("README.md")).is_err());
    }

    #[test]
    fn test_commit_without_changes_is_error() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let err = ws.commit_all("nothing").unwrap_err();
        assert!(matches!(err, Error::Commit { .. }));
        assert!(err.to_string().contains("nothing to commit"));
    }

    #[test]
    fn test_commit_on_detached_head_is_error() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let repo = Repository::open(ws.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap().id();
        repo.set_head_detached(head).unwrap();
        fs::write(ws.path().join("change.txt"), "x").unwrap();

        let err = ws.commit_all("detached").unwrap_err();
        assert!(err.to_string().contains("detached"));
    }

    #[test]
    fn test_push_updates_origin() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let branch = ws.create_and_checkout_branch("Fix login bug").unwrap();
        fs::write(ws.path().join("fix.txt"), "fixed").unwrap();
        let sha = ws.commit_all("fix").unwrap();

        ws.push(&branch, &creds()).unwrap();

        let origin = Repository::open_bare(&fx.origin).unwrap();
        let pushed = origin
            .find_reference(&branch.ref_name())
            .unwrap()
            .target()
            .unwrap();
        assert_eq!(pushed.to_string(), sha);
    }

    #[test]
    fn test_push_to_missing_origin_fails() {
        let fx = Fixture::new();
        let ws = GitWorkspace::clone_repository(&fx.url(), &fx.scratch, None).unwrap();
        let branch = ws.create_and_checkout_branch("Fix login bug").unwrap();
        fs::write(ws.path().join("fix.txt"), "fixed").unwrap();
        ws.commit_all("fix").unwrap();
        fs::remove_dir_all(&fx.origin).unwrap();

        let err = ws.push(&branch, &creds()).unwrap_err();
        assert!(matches!(err, Error::Push { .. }), "{err:?}");
        assert!(err.to_string().contains(branch.as_str()));
    }
}
