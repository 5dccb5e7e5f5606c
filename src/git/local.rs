//! Local working copy inspection via libgit2.
//!
//! `git2::Repository` is `!Send`, so it is opened per call from the stored
//! path instead of being held across awaits.

use std::path::{Path, PathBuf};

use git2::{DiffOptions, Repository};

use super::remote_url::{RepoName, parse_remote_url};
use crate::error::GptMyPrError;

/// Read-only view of the local git repository the tool runs in.
pub trait LocalRepository: Send + Sync {
    /// `owner/repo` derived from the first configured remote.
    fn repository_name(&self) -> Result<RepoName, GptMyPrError>;

    /// Whether `path` (repository-relative) differs between index and working tree.
    fn has_uncommitted_changes(&self, path: &str) -> Result<bool, GptMyPrError>;

    /// Root directory that repository-relative paths resolve against.
    fn workdir(&self) -> &Path;
}

/// `LocalRepository` backed by the repository at a fixed directory.
pub struct Git2Repository {
    root: PathBuf,
}

impl Git2Repository {
    /// Use the repository whose working tree root is `root`.
    ///
    /// The directory itself must be the repository root; parents are not searched.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, GptMyPrError> {
        let root = root.into();
        Repository::open(&root)?;
        Ok(Self { root })
    }

    fn repo(&self) -> Result<Repository, GptMyPrError> {
        Ok(Repository::open(&self.root)?)
    }
}

impl LocalRepository for Git2Repository {
    fn repository_name(&self) -> Result<RepoName, GptMyPrError> {
        let repo = self.repo()?;
        let remotes = repo.remotes()?;
        let first = remotes
            .iter()
            .flatten()
            .next()
            .ok_or_else(|| GptMyPrError::Git("Git repo does not have remotes".into()))?;

        let remote = repo.find_remote(first)?;
        let url = remote.url().ok_or_else(|| {
            GptMyPrError::Git(format!("remote '{first}' has no valid UTF-8 URL"))
        })?;

        tracing::debug!(remote = first, url, "resolving repository name from remote");
        parse_remote_url(url)
    }

    fn has_uncommitted_changes(&self, path: &str) -> Result<bool, GptMyPrError> {
        let repo = self.repo()?;
        let mut opts = DiffOptions::new();
        opts.pathspec(path).disable_pathspec_match(true);

        let diff = repo.diff_index_to_workdir(None, Some(&mut opts))?;
        let target = Path::new(path);
        let changed = diff.deltas().any(|delta| {
            delta.old_file().path() == Some(target) || delta.new_file().path() == Some(target)
        });
        Ok(changed)
    }

    fn workdir(&self) -> &Path {
        &self.root
    }
}
