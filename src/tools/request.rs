use std::collections::HashMap;

use minijinja::Value;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ai::types::{ChatMessage, ToolSpec};
use crate::config::types::PromptTemplate;
use crate::error::GptMyPrError;
use crate::git::types::ReviewComment;
use crate::template::render::render_prompt;

/// Function the model must call with the rewritten file.
pub const UPDATE_TOOL_NAME: &str = "send_back_updated_source_code";
/// Sole argument of [`UPDATE_TOOL_NAME`].
pub const UPDATED_SOURCE_FIELD: &str = "updated_source_code";

/// Comment as embedded in the prompt.
#[derive(Debug, Serialize)]
struct PromptComment<'a> {
    diff_hunk: &'a str,
    comment: &'a str,
}

/// Arguments of the forced tool call.
#[derive(Debug, Deserialize)]
struct UpdatedSourceArgs {
    updated_source_code: Option<String>,
}

/// Tool definition forcing a single `send_back_updated_source_code` call.
pub fn update_code_tool() -> ToolSpec {
    ToolSpec {
        name: UPDATE_TOOL_NAME.to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                UPDATED_SOURCE_FIELD: {
                    "type": "string",
                    "description": "updated source code after implementing edits according to comments",
                }
            },
            "required": [UPDATED_SOURCE_FIELD],
        }),
    }
}

/// Build the system + user message pair for one file.
///
/// The user message carries every comment as `{diff_hunk, comment}` JSON and
/// the file content from the PR head commit.
pub fn build_messages(
    template: &PromptTemplate,
    file_content: &str,
    comments: &[ReviewComment],
) -> Result<Vec<ChatMessage>, GptMyPrError> {
    let prompt_comments: Vec<PromptComment<'_>> = comments
        .iter()
        .map(|c| PromptComment {
            diff_hunk: &c.diff_hunk,
            comment: &c.body,
        })
        .collect();
    let comments_json = serde_json::to_string(&prompt_comments)?;

    let vars: HashMap<String, Value> = [
        ("tool_name", Value::from(UPDATE_TOOL_NAME)),
        ("comments_json", Value::from(comments_json)),
        ("file_content", Value::from(file_content)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let rendered = render_prompt(template, vars)?;
    Ok(vec![
        ChatMessage::system(rendered.system),
        ChatMessage::user(rendered.user),
    ])
}

/// Pull the rewritten file out of the tool-call arguments.
///
/// Missing or empty `updated_source_code` is an error.
pub fn parse_updated_source(arguments: &str) -> Result<String, GptMyPrError> {
    let args: UpdatedSourceArgs = serde_json::from_str(arguments)?;
    args.updated_source_code
        .filter(|code| !code.is_empty())
        .ok_or_else(GptMyPrError::empty_generated_code)
}
