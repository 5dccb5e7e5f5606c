use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::config::{default_config_path, expand_home, load_or_create};
use crate::console::{Console, InquireConsole};
use crate::error::GptMyPrError;
use crate::tools::{self, TokenUsage};

/// GPTmyPR: apply pull request review comments to your working copy with OpenAI.
///
/// Run from the root of a local clone of the repository.
#[derive(Parser, Debug)]
#[command(name = "gptmypr", version, about)]
pub struct Cli {
    /// Number of the pull request whose review comments should be applied.
    #[arg(long)]
    pub pr: u64,

    /// Path to the JSON config file (created interactively if missing).
    #[arg(long)]
    pub config: Option<String>,

    /// Log progress, including already-processed comments.
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file location with a leading `~` expanded.
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => expand_home(path),
            None => default_config_path(),
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_directive(verbose: bool) -> &'static str {
    if verbose { "warn,gptmypr=info" } else { "warn" }
}

/// Line printed after every file has been handled.
pub fn success_message(usage: &TokenUsage) -> String {
    format!(
        "Operation completed successfully. OpenAI GPT tokens usage - Input: {}, Output: {}.",
        usage.prompt_tokens, usage.completion_tokens
    )
}

pub async fn run(cli: Cli) -> Result<(), GptMyPrError> {
    let console: Arc<dyn Console> = Arc::new(InquireConsole::new());
    let config = load_or_create(&cli.config_path(), console.as_ref()).await?;

    tracing::info!(
        pr = cli.pr,
        model = %config.openai_model,
        reaction = %config.reaction_to_mark_comment_as_read,
        "starting gptmypr"
    );

    let workdir = std::env::current_dir()?;
    let usage = tools::update_pr_files(config, cli.pr, &workdir, console.clone(), None).await?;

    console.notify(&success_message(&usage));
    Ok(())
}
