use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Json};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::types::{
    Config, DEFAULT_GITHUB_API_BASE, DEFAULT_OPENAI_API_BASE, DEFAULT_OPENAI_MODEL, RawConfig,
    ReactionKind, RequiredField,
};
use crate::console::Console;
use crate::error::GptMyPrError;

/// Config file name placed in the user's home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".gptmypr.conf.json";

/// Default config path: `~/.gptmypr.conf.json`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(path),
    }
}

/// Load the config at `path`, or create it interactively if it does not exist.
pub async fn load_or_create(path: &Path, console: &dyn Console) -> Result<Config, GptMyPrError> {
    if path.is_file() {
        return load_config(path);
    }

    console.notify(&format!(
        "Configuration file will be created at: {}",
        path.display()
    ));
    let raw = ask_config(console).await?;
    save_config(path, &raw)?;
    tracing::info!(path = %path.display(), "configuration saved");
    validate(raw, path)
}

/// Read and validate an existing config file.
///
/// The file is authoritative. `GITHUB_TOKEN` and `OPENAI_API_KEY`/`OPENAI_KEY`
/// only supply a secret the file leaves unset or empty.
pub fn load_config(path: &Path) -> Result<Config, GptMyPrError> {
    let mut raw = extract_raw(file_figment(path), path)?;
    fill_missing_secrets(&mut raw, &env_secrets()?);
    validate(raw, path)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new().merge(Json::file(path))
}

fn env_figment() -> Figment {
    Figment::from(
        Env::raw()
            .only(&["GITHUB_TOKEN", "OPENAI_API_KEY", "OPENAI_KEY"])
            .map(|key| match key.as_str() {
                "GITHUB_TOKEN" => "github_token".into(),
                "OPENAI_API_KEY" | "OPENAI_KEY" => "openai_apikey".into(),
                _ => key.into(),
            }),
    )
}

fn env_secrets() -> Result<RawConfig, GptMyPrError> {
    env_figment().extract().map_err(|e| {
        GptMyPrError::Config(format!(
            "Failed to read GITHUB_TOKEN/OPENAI_API_KEY from the environment. Error: {e}."
        ))
    })
}

/// Copy secrets from `env` into `raw` where `raw` has none. Empty values never count.
pub fn fill_missing_secrets(raw: &mut RawConfig, env: &RawConfig) {
    for field in [RequiredField::GithubToken, RequiredField::OpenAiApiKey] {
        if raw.get(field).is_some() {
            continue;
        }
        if let Some(value) = env.get(field) {
            tracing::debug!(field = field.key(), "secret taken from the environment");
            raw.set(field, value.to_string());
        }
    }
}

fn extract_raw(figment: Figment, path: &Path) -> Result<RawConfig, GptMyPrError> {
    figment.extract().map_err(|e| {
        GptMyPrError::Config(format!(
            "Failed to load configuration from {}. Error: {e}. Please ensure the file is valid or remove it to proceed.",
            path.display()
        ))
    })
}

#[cfg(test)]
fn extract_config(figment: Figment, path: &Path) -> Result<Config, GptMyPrError> {
    validate(extract_raw(figment, path)?, path)
}

/// Check every required field in order and build the typed config.
pub fn validate(raw: RawConfig, path: &Path) -> Result<Config, GptMyPrError> {
    for field in RequiredField::ALL {
        if raw.get(field).is_none() {
            return Err(GptMyPrError::Config(format!(
                "Missing configuration: '{}' must be set in the config file '{}'.",
                field.key(),
                path.display()
            )));
        }
    }

    let reaction_label = raw
        .get(RequiredField::ReactionToMarkCommentAsRead)
        .unwrap_or_default();
    let reaction: ReactionKind = reaction_label.parse().map_err(|e| {
        GptMyPrError::Config(format!(
            "Invalid configuration: 'reaction_to_mark_comment_as_read' in '{}': {e}.",
            path.display()
        ))
    })?;

    let RawConfig {
        github_token,
        openai_apikey,
        openai_model,
        github_api_base,
        openai_api_base,
        ..
    } = raw;

    Ok(Config {
        github_token: github_token.unwrap_or_default(),
        reaction_to_mark_comment_as_read: reaction,
        openai_apikey: openai_apikey.unwrap_or_default(),
        openai_model: openai_model.unwrap_or_default(),
        github_api_base: github_api_base
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string()),
        openai_api_base: openai_api_base
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string()),
    })
}

/// Prompt for each required field.
async fn ask_config(console: &dyn Console) -> Result<RawConfig, GptMyPrError> {
    let mut raw = RawConfig::default();
    for field in RequiredField::ALL {
        let value = match field {
            RequiredField::GithubToken | RequiredField::OpenAiApiKey => {
                console.ask_secret(field.key()).await?
            }
            RequiredField::OpenAiModel => {
                console
                    .ask_text(field.key(), Some(DEFAULT_OPENAI_MODEL))
                    .await?
            }
            RequiredField::ReactionToMarkCommentAsRead => {
                console
                    .select(
                        field.key(),
                        &ReactionKind::labels(),
                        ReactionKind::default().as_str(),
                    )
                    .await?
            }
        };
        raw.set(field, value);
    }
    Ok(raw)
}

/// Write the config as JSON with 4-space indentation.
fn save_config(path: &Path, raw: &RawConfig) -> Result<(), GptMyPrError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    raw.serialize(&mut ser)?;
    std::fs::write(path, buf)?;
    Ok(())
}
