use std::ops::AddAssign;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::ai::AiHandler;
use crate::ai::types::{FinishReason, Usage};
use crate::config::Config;
use crate::config::types::PromptTemplate;
use crate::console::Console;
use crate::error::GptMyPrError;
use crate::git::GitProvider;
use crate::git::local::LocalRepository;
use crate::git::types::{PullRequest, ReviewComment};
use crate::processing::comments::{
    CommentGroups, format_comment_ids, group_by_path, unprocessed_comments,
};
use crate::tools::request::{build_messages, parse_updated_source, update_code_tool};

/// Token counters summed over every completion of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl AddAssign<Usage> for TokenUsage {
    fn add_assign(&mut self, usage: Usage) {
        self.prompt_tokens += u64::from(usage.prompt_tokens);
        self.completion_tokens += u64::from(usage.completion_tokens);
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// What happened to one file's comment group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The user declined to overwrite uncommitted local changes.
    SkippedByUser,
    /// Every comment already carries the processed marker.
    NothingToProcess,
    /// The file was rewritten and its comments marked.
    Updated(TokenUsage),
}

/// Review comment resolver: rewrites each commented file from the PR head
/// according to its unprocessed comments and marks those comments as read.
///
/// Files are handled one at a time in comment-group order. Any error from
/// fetching content onwards aborts the whole run; files already written stay
/// written.
pub struct PRCommentResolver {
    provider: Arc<dyn GitProvider>,
    ai: Arc<dyn AiHandler>,
    local: Arc<dyn LocalRepository>,
    console: Arc<dyn Console>,
    config: Config,
    template: PromptTemplate,
}

impl PRCommentResolver {
    pub fn new(
        provider: Arc<dyn GitProvider>,
        ai: Arc<dyn AiHandler>,
        local: Arc<dyn LocalRepository>,
        console: Arc<dyn Console>,
        config: Config,
        template: PromptTemplate,
    ) -> Self {
        Self {
            provider,
            ai,
            local,
            console,
            config,
            template,
        }
    }

    /// Run the pipeline for pull request `pr_number` and return the summed token usage.
    pub async fn run(&self, pr_number: u64) -> Result<TokenUsage, GptMyPrError> {
        let user = self.provider.get_user_login().await?;
        let repo_full = self.provider.repo_full_name().to_string();

        self.provider.get_repository().await.map_err(|e| match e {
            GptMyPrError::NotFound(msg) => GptMyPrError::NotFound(format!(
                "Repo {repo_full} not found on GitHub: {msg}. Change github_token in config"
            )),
            other => other,
        })?;

        let pr = self
            .provider
            .get_pull_request(pr_number)
            .await
            .map_err(|e| match e {
                GptMyPrError::NotFound(msg) => GptMyPrError::NotFound(format!(
                    "Pull request {pr_number} not found for {repo_full}: {msg}. Choose correct PR number for --pr parameter."
                )),
                other => other,
            })?;

        tracing::info!(
            title = %pr.title,
            comments = pr.review_comments,
            "PR \"{}\" has {} comments",
            pr.title,
            pr.review_comments
        );

        let comments = self.provider.get_review_comments(pr.number).await?;
        let groups = group_by_path(comments);
        self.process_groups(&pr, &user, &groups).await
    }

    /// Process every file group in order, summing token usage of updated files.
    pub async fn process_groups(
        &self,
        pr: &PullRequest,
        user: &str,
        groups: &CommentGroups,
    ) -> Result<TokenUsage, GptMyPrError> {
        let mut total = TokenUsage::default();
        for (path, comments) in groups {
            match self.process_file(pr, user, path, comments).await? {
                FileOutcome::Updated(usage) => total += usage,
                FileOutcome::SkippedByUser | FileOutcome::NothingToProcess => {}
            }
        }
        Ok(total)
    }

    /// Run one file through gate → filter → fetch → complete → mark → write.
    pub async fn process_file(
        &self,
        pr: &PullRequest,
        user: &str,
        path: &str,
        comments: &[ReviewComment],
    ) -> Result<FileOutcome, GptMyPrError> {
        let target = self.local_target(path)?;

        if self.local.has_uncommitted_changes(path)? {
            let ids = format_comment_ids(comments);
            let allow = self
                .console
                .confirm(
                    &format!(
                        "PR comments {ids} require changes to {path}, which has uncommitted changes. \
                         The file will be REWRITTEN, and uncommitted changes in {path} will be LOST. Continue?"
                    ),
                    false,
                )
                .await?;
            if !allow {
                self.console.notify(&format!(
                    "Comments {ids} have been skipped. Proceeding to the next comment..."
                ));
                return Ok(FileOutcome::SkippedByUser);
            }
        }

        let marker = self.config.reaction_to_mark_comment_as_read;
        let pending = unprocessed_comments(self.provider.as_ref(), comments, user, marker).await?;
        if pending.is_empty() {
            tracing::debug!(path, "no unprocessed comments");
            return Ok(FileOutcome::NothingToProcess);
        }

        let pending_ids = format_comment_ids(&pending);
        tracing::info!(path, comments = %pending_ids, "processing the comments {pending_ids} for {path}");

        let file_content = self
            .provider
            .get_file_content(path, &pr.head_sha)
            .await
            .map_err(|e| match e {
                auth @ GptMyPrError::GithubAuth(_) => auth,
                other => GptMyPrError::GitProvider(format!("Can't fetch {path} from GitHub: {other}.")),
            })?;

        let messages = build_messages(&self.template, &file_content, &pending)?;
        let response = self
            .ai
            .chat_completion_with_tool(&self.config.openai_model, &messages, &update_code_tool())
            .await?;

        let tool_call = response
            .tool_calls
            .first()
            .ok_or_else(GptMyPrError::empty_completion)?;
        if response.finish_reason == FinishReason::Length {
            return Err(GptMyPrError::truncated_completion());
        }
        tracing::debug!(path, tool = %tool_call.name, "received tool call");
        let updated = parse_updated_source(&tool_call.arguments)?;

        for comment in &pending {
            self.provider
                .create_comment_reaction(comment.id, marker)
                .await
                .map_err(|e| match e {
                    auth @ GptMyPrError::GithubAuth(_) => auth,
                    other => GptMyPrError::GitProvider(format!(
                        "Can't mark comment {} as read by reaction '{marker}': {other}",
                        comment.id
                    )),
                })?;
        }

        write_local_file(&target, &updated)?;
        tracing::info!(path, bytes = updated.len(), "file updated");

        let mut usage = TokenUsage::default();
        if let Some(u) = response.usage {
            tracing::debug!(path, total_tokens = u.total_tokens, "completion usage");
            usage += u;
        }
        Ok(FileOutcome::Updated(usage))
    }

    /// Resolve a repository-relative path under the working tree root.
    fn local_target(&self, path: &str) -> Result<PathBuf, GptMyPrError> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || !is_plain {
            return Err(GptMyPrError::Other(format!(
                "refusing to write outside the repository: {path}"
            )));
        }
        Ok(self.local.workdir().join(relative))
    }
}

/// Replace the file at `target` with `content`, creating parent directories.
fn write_local_file(target: &Path, content: &str) -> Result<(), GptMyPrError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, content)?;
    Ok(())
}
