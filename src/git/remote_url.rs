use url::Url;

use crate::error::GptMyPrError;

/// Parsed `owner/repo` pair of a git remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub repo: String,
}

impl RepoName {
    /// "owner/repo" as used by the GitHub REST API.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Derive `owner/repo` from a remote URL.
///
/// A trailing `.git` is stripped and the last two path segments are taken.
/// Handles scheme URLs (`https://`, `ssh://`, `git://`) and scp-like remotes
/// (`git@github.com:owner/repo.git`).
pub fn parse_remote_url(remote_url: &str) -> Result<RepoName, GptMyPrError> {
    let trimmed = remote_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let path = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url.path().to_string(),
        // scp-like: [user@]host:path. `Url` rejects these or reads the host as a scheme.
        _ => match trimmed.split_once(':') {
            Some((host, path)) if !host.contains('/') => path.to_string(),
            _ => trimmed.to_string(),
        },
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., owner, repo] => Ok(RepoName {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }),
        _ => Err(GptMyPrError::Git(format!(
            "cannot derive owner/repo from remote URL '{remote_url}'"
        ))),
    }
}
