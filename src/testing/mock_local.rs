use std::collections::HashSet;
use std::path::Path;

use tempfile::TempDir;

use crate::error::GptMyPrError;
use crate::git::local::LocalRepository;
use crate::git::remote_url::RepoName;

/// Working copy rooted in a temporary directory with scripted dirty paths.
pub struct MockLocalRepository {
    dir: TempDir,
    dirty: HashSet<String>,
}

impl MockLocalRepository {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            dirty: HashSet::new(),
        }
    }

    /// Report `path` as having uncommitted changes.
    pub fn with_dirty(mut self, path: &str) -> Self {
        self.dirty.insert(path.into());
        self
    }

    pub fn write_file(&self, path: &str, content: &str) {
        let target = self.dir.path().join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(target, content).unwrap();
    }
}

impl LocalRepository for MockLocalRepository {
    fn repository_name(&self) -> Result<RepoName, GptMyPrError> {
        Ok(RepoName {
            owner: "acme".into(),
            repo: "widgets".into(),
        })
    }

    fn has_uncommitted_changes(&self, path: &str) -> Result<bool, GptMyPrError> {
        Ok(self.dirty.contains(path))
    }

    fn workdir(&self) -> &Path {
        self.dir.path()
    }
}
