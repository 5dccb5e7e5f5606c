pub mod request;
pub mod resolve;

use std::path::Path;
use std::sync::Arc;

use crate::ai::AiHandler;
use crate::ai::openai::OpenAiCompatibleHandler;
use crate::config::Config;
use crate::config::prompts::load_prompts;
use crate::console::Console;
use crate::error::GptMyPrError;
use crate::git::GitProvider;
use crate::git::github::GithubProvider;
use crate::git::local::{Git2Repository, LocalRepository};

pub use resolve::{PRCommentResolver, TokenUsage};

/// Resolve the AI handler: use the injected one or create from config.
pub fn resolve_ai_handler(
    injected: &Option<Arc<dyn AiHandler>>,
    config: &Config,
) -> Result<Arc<dyn AiHandler>, GptMyPrError> {
    match injected {
        Some(ai) => Ok(ai.clone()),
        None => Ok(Arc::new(OpenAiCompatibleHandler::from_config(config)?)),
    }
}

/// Apply the review comments of pull request `pr_number` to the working copy at `workdir`.
///
/// The GitHub repository is derived from the first remote of the local
/// repository, so this must run from the repository root.
pub async fn update_pr_files(
    config: Config,
    pr_number: u64,
    workdir: &Path,
    console: Arc<dyn Console>,
    ai: Option<Arc<dyn AiHandler>>,
) -> Result<TokenUsage, GptMyPrError> {
    let local = Git2Repository::open(workdir)?;
    let repo_name = local.repository_name()?;
    tracing::debug!(repo = %repo_name.full_name(), "resolved repository from git remote");

    let provider: Arc<dyn GitProvider> =
        Arc::new(GithubProvider::new(&config, &repo_name.full_name())?);
    let ai = resolve_ai_handler(&ai, &config)?;
    let template = load_prompts()?.update_code_prompt;

    let resolver = PRCommentResolver::new(
        provider,
        ai,
        Arc::new(local),
        console,
        config,
        template,
    );
    resolver.run(pr_number).await
}
