use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::AiHandler;
use super::types::{ChatMessage, ChatResponse, FinishReason, ToolCall, ToolSpec, Usage};
use crate::config::Config;
use crate::error::GptMyPrError;

/// OpenAI-compatible chat completions handler.
///
/// Works with any provider exposing the `/v1/chat/completions` API with
/// function tools. A single request is made per call; failures propagate.
pub struct OpenAiCompatibleHandler {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatibleHandler {
    /// Create a new handler from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, GptMyPrError> {
        let client = Client::builder().build().map_err(GptMyPrError::Http)?;

        Ok(Self {
            client,
            base_url: config.openai_api_base.clone(),
            api_key: config.openai_apikey.clone(),
        })
    }

    /// Build the request body for the chat completions API.
    fn build_request_body(
        model: &str,
        messages: &[ChatMessage],
        tool: &ToolSpec,
    ) -> serde_json::Value {
        json!({
            "model": model,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": tool.name,
                    "parameters": tool.parameters,
                },
            }],
            "tool_choice": {
                "type": "function",
                "function": {"name": tool.name},
            },
        })
    }

    async fn send_completion(
        &self,
        body: &serde_json::Value,
    ) -> Result<ChatResponse, GptMyPrError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut req = self.client.post(&url).json(body);

        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req.send().await.map_err(GptMyPrError::Http)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body_text));
        }

        let api_resp: ApiResponse = resp.json().await.map_err(GptMyPrError::Http)?;
        parse_response(api_resp)
    }
}

#[async_trait]
impl AiHandler for OpenAiCompatibleHandler {
    async fn chat_completion_with_tool(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tool: &ToolSpec,
    ) -> Result<ChatResponse, GptMyPrError> {
        let body = Self::build_request_body(model, messages, tool);
        tracing::debug!(model, tool = %tool.name, messages = messages.len(), "sending chat completion");
        self.send_completion(&body).await
    }
}

/// Map a non-success status to an error, pulling `error.message` out of the
/// OpenAI error envelope when present.
fn status_error(status: StatusCode, body_text: &str) -> GptMyPrError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body_text)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body_text.to_string());

    if status == StatusCode::UNAUTHORIZED {
        GptMyPrError::OpenAiAuth(message)
    } else {
        GptMyPrError::AiHandler(format!("API returned {status}: {message}"))
    }
}

fn parse_response(api_resp: ApiResponse) -> Result<ChatResponse, GptMyPrError> {
    let choice = api_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(GptMyPrError::empty_completion)?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|c| ToolCall {
            name: c.function.name,
            arguments: c.function.arguments,
        })
        .collect();

    let finish_reason = choice
        .finish_reason
        .as_deref()
        .map(FinishReason::from)
        .unwrap_or_default();

    let usage = api_resp.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(ChatResponse {
        tool_calls,
        finish_reason,
        usage,
    })
}

// ── API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ApiToolCall {
    function: ApiFunction,
}

#[derive(Debug, Deserialize)]
struct ApiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool() -> ToolSpec {
        ToolSpec {
            name: "send_back_updated_source_code".into(),
            parameters: json!({"type": "object"}),
        }
    }

    #[test]
    fn test_request_body_forces_tool_choice() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("usr")];
        let body = OpenAiCompatibleHandler::build_request_body("gpt-4o", &messages, &sample_tool());

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(
            body["tools"][0]["function"]["name"],
            "send_back_updated_source_code"
        );
        assert_eq!(body["tool_choice"]["type"], "function");
        assert_eq!(
            body["tool_choice"]["function"]["name"],
            "send_back_updated_source_code"
        );
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_response_with_tool_call() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "send_back_updated_source_code",
                            "arguments": "{\"updated_source_code\": \"print('fixed')\"}"
                        }
                    }]
                },
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 15, "total_tokens": 135}
        }"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let resp = parse_response(api).unwrap();

        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].name, "send_back_updated_source_code");
        assert!(resp.tool_calls[0].arguments.contains("print('fixed')"));
        assert_eq!(resp.finish_reason, FinishReason::Stop);
        let usage = resp.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 15);
    }

    #[test]
    fn test_parse_response_without_tool_calls() {
        let raw = r#"{"choices": [{"message": {"content": "hello"}, "finish_reason": "stop"}]}"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let resp = parse_response(api).unwrap();
        assert!(resp.tool_calls.is_empty());
        assert!(resp.usage.is_none());
    }

    #[test]
    fn test_parse_response_no_choices_is_empty_completion() {
        let api: ApiResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let err = parse_response(api).unwrap_err();
        assert!(matches!(err, GptMyPrError::CompletionShape(_)));
        assert!(err.to_string().contains("empty completion"));
    }

    #[test]
    fn test_unauthorized_maps_to_auth_error() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let err = status_error(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, GptMyPrError::OpenAiAuth(ref m) if m == "Incorrect API key provided"));
    }

    #[test]
    fn test_other_status_maps_to_handler_error() {
        let err = status_error(StatusCode::NOT_FOUND, "model not found");
        match err {
            GptMyPrError::AiHandler(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("model not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
