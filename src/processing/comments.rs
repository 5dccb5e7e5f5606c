use indexmap::IndexMap;

use crate::config::ReactionKind;
use crate::error::GptMyPrError;
use crate::git::GitProvider;
use crate::git::types::{CommentReaction, ReviewComment};

/// Review comments keyed by file path, in first-seen order.
pub type CommentGroups = IndexMap<String, Vec<ReviewComment>>;

/// Partition comments by `path`. Every comment lands in exactly one group and
/// keeps its fetch order within the group.
pub fn group_by_path(comments: Vec<ReviewComment>) -> CommentGroups {
    let mut groups = CommentGroups::new();
    for comment in comments {
        groups
            .entry(comment.path.clone())
            .or_default()
            .push(comment);
    }
    groups
}

/// A comment is processed iff `user` left a reaction with exactly `marker`'s label.
pub fn is_processed(reactions: &[CommentReaction], user: &str, marker: ReactionKind) -> bool {
    reactions
        .iter()
        .any(|r| r.user == user && r.content == marker.as_str())
}

/// Comments not yet marked by `user`, in input order.
///
/// Reactions are fetched per comment; any fetch failure aborts.
pub async fn unprocessed_comments(
    provider: &dyn GitProvider,
    comments: &[ReviewComment],
    user: &str,
    marker: ReactionKind,
) -> Result<Vec<ReviewComment>, GptMyPrError> {
    let mut pending = Vec::with_capacity(comments.len());
    for comment in comments {
        let reactions = provider.get_comment_reactions(comment.id).await?;
        if is_processed(&reactions, user, marker) {
            tracing::info!(
                comment_id = comment.id,
                path = %comment.path,
                "comment has already been processed"
            );
            continue;
        }
        pending.push(comment.clone());
    }
    Ok(pending)
}

/// Comment ids rendered as a JSON array, e.g. `[11,12]`.
pub fn format_comment_ids(comments: &[ReviewComment]) -> String {
    let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
    serde_json::to_string(&ids).unwrap_or_default()
}
