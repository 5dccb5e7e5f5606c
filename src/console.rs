//! Interactive terminal questions.
//!
//! Components that need to ask the user something receive a `Console`
//! value instead of talking to the terminal directly, so tests can script
//! the answers.

use async_trait::async_trait;
use inquire::ui::{RenderConfig, Styled};
use inquire::validator::ValueRequiredValidator;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};

use crate::error::GptMyPrError;

#[async_trait]
pub trait Console: Send + Sync {
    /// Show a one-line message to the user.
    fn notify(&self, message: &str);

    /// Ask a yes/no question.
    async fn confirm(&self, message: &str, default: bool) -> Result<bool, GptMyPrError>;

    /// Ask for a non-empty line of text, optionally pre-filled with `default`.
    async fn ask_text(&self, label: &str, default: Option<&str>)
    -> Result<String, GptMyPrError>;

    /// Ask for a non-empty secret without echoing it.
    async fn ask_secret(&self, label: &str) -> Result<String, GptMyPrError>;

    /// Ask the user to pick one of `choices`; `default` is preselected.
    async fn select(
        &self,
        label: &str,
        choices: &[&str],
        default: &str,
    ) -> Result<String, GptMyPrError>;
}

/// `Console` backed by `inquire` prompts on the controlling terminal.
pub struct InquireConsole;

impl InquireConsole {
    pub fn new() -> Self {
        Self
    }

    fn render_config() -> RenderConfig<'static> {
        RenderConfig::default().with_highlighted_option_prefix(Styled::new("➤"))
    }
}

impl Default for InquireConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a blocking inquire prompt off the async executor.
async fn run_prompt<T, F>(prompt: F) -> Result<T, GptMyPrError>
where
    T: Send + 'static,
    F: FnOnce() -> inquire::error::InquireResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| GptMyPrError::Prompt(format!("failed to spawn prompt task: {e}")))?
        .map_err(|e| GptMyPrError::Prompt(format!("prompt failed: {e}")))
}

#[async_trait]
impl Console for InquireConsole {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    async fn confirm(&self, message: &str, default: bool) -> Result<bool, GptMyPrError> {
        let message = message.to_string();
        run_prompt(move || {
            Confirm::new(&message)
                .with_default(default)
                .with_render_config(Self::render_config())
                .prompt()
        })
        .await
    }

    async fn ask_text(
        &self,
        label: &str,
        default: Option<&str>,
    ) -> Result<String, GptMyPrError> {
        let label = label.to_string();
        let default = default.map(str::to_string);
        run_prompt(move || {
            let mut text = Text::new(&label)
                .with_validator(ValueRequiredValidator::default())
                .with_render_config(Self::render_config());
            if let Some(ref d) = default {
                text = text.with_default(d);
            }
            text.prompt()
        })
        .await
    }

    async fn ask_secret(&self, label: &str) -> Result<String, GptMyPrError> {
        let label = label.to_string();
        run_prompt(move || {
            Password::new(&label)
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_validator(ValueRequiredValidator::default())
                .with_render_config(Self::render_config())
                .prompt()
        })
        .await
    }

    async fn select(
        &self,
        label: &str,
        choices: &[&str],
        default: &str,
    ) -> Result<String, GptMyPrError> {
        let label = label.to_string();
        let options: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
        let cursor = options.iter().position(|c| c == default).unwrap_or(0);
        run_prompt(move || {
            Select::new(&label, options)
                .with_starting_cursor(cursor)
                .with_render_config(Self::render_config())
                .prompt()
        })
        .await
    }
}
