use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ai::AiHandler;
use crate::ai::types::{ChatMessage, ChatResponse, FinishReason, ToolSpec, Usage};
use crate::error::GptMyPrError;

/// A recorded AI call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAiCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tool_name: String,
}

/// Mock AI handler that returns pre-configured responses in order.
///
/// The last response is reused once the queue is down to one entry.
pub struct MockAiHandler {
    responses: Mutex<VecDeque<ChatResponse>>,
    call_count: Mutex<usize>,
    recorded_calls: Mutex<Vec<RecordedAiCall>>,
}

impl MockAiHandler {
    /// Create a mock that returns the same response for every call.
    pub fn new(response: ChatResponse) -> Self {
        Self::with_responses(vec![response])
    }

    /// Create a mock that returns responses in order (one per call).
    pub fn with_responses(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            call_count: Mutex::new(0),
            recorded_calls: Mutex::new(Vec::new()),
        }
    }

    /// A completion whose choice carries no tool call.
    pub fn no_tool_calls() -> ChatResponse {
        ChatResponse {
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Stop,
            usage: Some(Usage::default()),
        }
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_recorded_calls(&self) -> Vec<RecordedAiCall> {
        self.recorded_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiHandler for MockAiHandler {
    async fn chat_completion_with_tool(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tool: &ToolSpec,
    ) -> Result<ChatResponse, GptMyPrError> {
        self.recorded_calls.lock().unwrap().push(RecordedAiCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            tool_name: tool.name.clone(),
        });
        *self.call_count.lock().unwrap() += 1;

        let mut responses = self.responses.lock().unwrap();
        if responses.len() == 1 {
            return Ok(responses.front().cloned().unwrap());
        }
        responses
            .pop_front()
            .ok_or_else(|| GptMyPrError::AiHandler("no more mock responses".into()))
    }
}
