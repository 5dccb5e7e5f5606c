use crate::config::types::PromptSettings;
use crate::error::GptMyPrError;

// Embedded so the binary needs no settings directory at runtime.
static UPDATE_CODE_PROMPTS_TOML: &str = include_str!("../../settings/update_code_prompts.toml");

/// Parse the embedded prompt templates.
pub fn load_prompts() -> Result<PromptSettings, GptMyPrError> {
    Ok(toml::from_str(UPDATE_CODE_PROMPTS_TOML)?)
}
