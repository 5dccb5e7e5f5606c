use serde::{Deserialize, Serialize};

/// Pull request fields the update pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// SHA of the latest commit on the PR's source branch.
    pub head_sha: String,
    /// Total review comments as reported by the API.
    pub review_comments: u64,
}

/// A review comment anchored to a diff region of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    /// Repository-relative path of the commented file.
    pub path: String,
    /// Diff context the comment is attached to.
    pub diff_hunk: String,
    pub body: String,
}

/// A reaction left on a review comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReaction {
    /// Login of the reacting user.
    pub user: String,
    /// GitHub reaction label, e.g. `eyes` or `+1`.
    pub content: String,
}
