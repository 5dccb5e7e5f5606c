use crate::ai::types::{ChatResponse, FinishReason, ToolCall, Usage};
use crate::config::types::{DEFAULT_GITHUB_API_BASE, DEFAULT_OPENAI_API_BASE};
use crate::config::{Config, ReactionKind};
use crate::git::types::{CommentReaction, PullRequest, ReviewComment};
use crate::tools::request::UPDATE_TOOL_NAME;

/// Valid config pointing at the public GitHub and OpenAI endpoints.
pub fn sample_config() -> Config {
    Config {
        github_token: "ghp_test".into(),
        reaction_to_mark_comment_as_read: ReactionKind::Eyes,
        openai_apikey: "sk-test".into(),
        openai_model: "gpt-4-1106-preview".into(),
        github_api_base: DEFAULT_GITHUB_API_BASE.into(),
        openai_api_base: DEFAULT_OPENAI_API_BASE.into(),
    }
}

/// Review comment with an empty diff hunk.
pub fn review_comment(id: u64, path: &str, body: &str) -> ReviewComment {
    ReviewComment {
        id,
        path: path.into(),
        diff_hunk: String::new(),
        body: body.into(),
    }
}

pub fn reaction(user: &str, content: &str) -> CommentReaction {
    CommentReaction {
        user: user.into(),
        content: content.into(),
    }
}

/// Open pull request whose head commit is `headsha{number}`.
pub fn sample_pr(number: u64) -> PullRequest {
    PullRequest {
        number,
        title: format!("Test PR #{number}"),
        head_sha: format!("headsha{number}"),
        review_comments: 2,
    }
}

/// Completion carrying one `send_back_updated_source_code` call.
pub fn tool_call_response(arguments: &str, prompt_tokens: u32, completion_tokens: u32) -> ChatResponse {
    ChatResponse {
        tool_calls: vec![ToolCall {
            name: UPDATE_TOOL_NAME.into(),
            arguments: arguments.into(),
        }],
        finish_reason: FinishReason::Stop,
        usage: Some(Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }),
    }
}
