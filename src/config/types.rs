use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Redact a secret string for Debug output. Shows "[REDACTED]" if non-empty, "[]" if empty.
fn redact(s: &str) -> &str {
    if s.is_empty() { "[]" } else { "[REDACTED]" }
}

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

// ── Reactions ───────────────────────────────────────────────────────

/// Reaction kinds GitHub accepts on pull request review comments.
///
/// One of them is configured as the "processed" marker. Matching against a
/// reaction's `content` is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReactionKind {
    #[serde(rename = "+1")]
    PlusOne,
    #[serde(rename = "-1")]
    MinusOne,
    #[serde(rename = "laugh")]
    Laugh,
    #[serde(rename = "confused")]
    Confused,
    #[serde(rename = "heart")]
    Heart,
    #[serde(rename = "hooray")]
    Hooray,
    #[serde(rename = "rocket")]
    Rocket,
    #[default]
    #[serde(rename = "eyes")]
    Eyes,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 8] = [
        ReactionKind::PlusOne,
        ReactionKind::MinusOne,
        ReactionKind::Laugh,
        ReactionKind::Confused,
        ReactionKind::Heart,
        ReactionKind::Hooray,
        ReactionKind::Rocket,
        ReactionKind::Eyes,
    ];

    /// The label GitHub uses in the reaction `content` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::PlusOne => "+1",
            ReactionKind::MinusOne => "-1",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Confused => "confused",
            ReactionKind::Heart => "heart",
            ReactionKind::Hooray => "hooray",
            ReactionKind::Rocket => "rocket",
            ReactionKind::Eyes => "eyes",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(ReactionKind::as_str).collect()
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| {
                format!(
                    "unknown reaction '{s}', expected one of: {}",
                    Self::labels().join(", ")
                )
            })
    }
}

// ── Required fields ─────────────────────────────────────────────────

/// Keys that must be present and non-empty in the config file, in the order
/// they are validated and prompted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    GithubToken,
    ReactionToMarkCommentAsRead,
    OpenAiApiKey,
    OpenAiModel,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::GithubToken,
        RequiredField::ReactionToMarkCommentAsRead,
        RequiredField::OpenAiApiKey,
        RequiredField::OpenAiModel,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RequiredField::GithubToken => "github_token",
            RequiredField::ReactionToMarkCommentAsRead => "reaction_to_mark_comment_as_read",
            RequiredField::OpenAiApiKey => "openai_apikey",
            RequiredField::OpenAiModel => "openai_model",
        }
    }
}

// ── Config file ─────────────────────────────────────────────────────

/// Config file contents as read, before validation.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_to_mark_comment_as_read: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_apikey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_base: Option<String>,
}

impl RawConfig {
    pub fn get(&self, field: RequiredField) -> Option<&str> {
        let value = match field {
            RequiredField::GithubToken => &self.github_token,
            RequiredField::ReactionToMarkCommentAsRead => &self.reaction_to_mark_comment_as_read,
            RequiredField::OpenAiApiKey => &self.openai_apikey,
            RequiredField::OpenAiModel => &self.openai_model,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, field: RequiredField, value: String) {
        let slot = match field {
            RequiredField::GithubToken => &mut self.github_token,
            RequiredField::ReactionToMarkCommentAsRead => &mut self.reaction_to_mark_comment_as_read,
            RequiredField::OpenAiApiKey => &mut self.openai_apikey,
            RequiredField::OpenAiModel => &mut self.openai_model,
        };
        *slot = Some(value);
    }
}

impl fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawConfig")
            .field(
                "github_token",
                &self.github_token.as_deref().map(redact),
            )
            .field(
                "reaction_to_mark_comment_as_read",
                &self.reaction_to_mark_comment_as_read,
            )
            .field(
                "openai_apikey",
                &self.openai_apikey.as_deref().map(redact),
            )
            .field("openai_model", &self.openai_model)
            .field("github_api_base", &self.github_api_base)
            .field("openai_api_base", &self.openai_api_base)
            .finish()
    }
}

/// Validated configuration, built once per run and never mutated.
#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub reaction_to_mark_comment_as_read: ReactionKind,
    pub openai_apikey: String,
    pub openai_model: String,
    /// GitHub REST base URL (Enterprise installs use `https://host/api/v3`).
    pub github_api_base: String,
    /// Any endpoint exposing the OpenAI `/chat/completions` API.
    pub openai_api_base: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &redact(&self.github_token))
            .field(
                "reaction_to_mark_comment_as_read",
                &self.reaction_to_mark_comment_as_read,
            )
            .field("openai_apikey", &redact(&self.openai_apikey))
            .field("openai_model", &self.openai_model)
            .field("github_api_base", &self.github_api_base)
            .field("openai_api_base", &self.openai_api_base)
            .finish()
    }
}

// ── Prompt templates ────────────────────────────────────────────────

/// A Jinja2 prompt template pair (system + user) loaded from TOML.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

/// Prompt settings embedded in the binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    pub update_code_prompt: PromptTemplate,
}
