pub mod github;
pub mod local;
pub mod remote_url;
pub mod types;

use async_trait::async_trait;
use types::*;

use crate::config::ReactionKind;
use crate::error::GptMyPrError;

/// Code hosting API scoped to a single repository.
///
/// Errors follow a fixed mapping: rejected credentials become
/// `GptMyPrError::GithubAuth`, missing objects `GptMyPrError::NotFound`, and
/// anything else `GptMyPrError::GitProvider`.
#[async_trait]
pub trait GitProvider: Send + Sync {
    /// "owner/repo" this provider is bound to.
    fn repo_full_name(&self) -> &str;

    /// Login of the authenticated user.
    async fn get_user_login(&self) -> Result<String, GptMyPrError>;

    /// Check that the repository exists and is visible to the token.
    async fn get_repository(&self) -> Result<(), GptMyPrError>;

    /// Look up a pull request by number.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GptMyPrError>;

    /// All review comments of a pull request, across every page, in API order.
    async fn get_review_comments(&self, number: u64) -> Result<Vec<ReviewComment>, GptMyPrError>;

    /// All reactions on a review comment.
    async fn get_comment_reactions(
        &self,
        comment_id: u64,
    ) -> Result<Vec<CommentReaction>, GptMyPrError>;

    /// Add a reaction to a review comment as the authenticated user.
    async fn create_comment_reaction(
        &self,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<(), GptMyPrError>;

    /// Decoded file contents at a specific commit SHA or ref.
    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<String, GptMyPrError>;
}
