pub mod openai;
pub mod types;

use crate::error::GptMyPrError;
use async_trait::async_trait;
use types::{ChatMessage, ChatResponse, ToolSpec};

/// Trait for AI/LLM provider handlers.
///
/// Implementors handle a single provider family (e.g. OpenAI-compatible endpoints).
/// Object-safe for dynamic dispatch via `Arc<dyn AiHandler>`.
#[async_trait]
pub trait AiHandler: Send + Sync {
    /// Send a chat completion request that forces the model to call `tool`.
    ///
    /// Free-form text answers are not accepted; callers read the tool calls
    /// of the returned response.
    async fn chat_completion_with_tool(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tool: &ToolSpec,
    ) -> Result<ChatResponse, GptMyPrError>;
}
