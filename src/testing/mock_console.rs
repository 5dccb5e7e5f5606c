use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::console::Console;
use crate::error::GptMyPrError;

/// Console with canned answers keyed by prompt label.
///
/// Unanswered text and select prompts take their default, unanswered confirms
/// take theirs, and an unanswered secret is an error. Every prompt label or
/// question is recorded in order, as is every notice.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: HashMap<String, String>,
    confirms: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, label: &str, value: &str) -> Self {
        self.answers.insert(label.into(), value.into());
        self
    }

    /// Queue the answer for the next yes/no question.
    pub fn with_confirm(self, answer: bool) -> Self {
        self.confirms.lock().unwrap().push_back(answer);
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    fn record(&self, label: &str) -> Option<String> {
        self.asked.lock().unwrap().push(label.to_string());
        self.answers.get(label).cloned()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    async fn confirm(&self, message: &str, default: bool) -> Result<bool, GptMyPrError> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    async fn ask_text(
        &self,
        label: &str,
        default: Option<&str>,
    ) -> Result<String, GptMyPrError> {
        Ok(self
            .record(label)
            .or_else(|| default.map(str::to_string))
            .unwrap_or_default())
    }

    async fn ask_secret(&self, label: &str) -> Result<String, GptMyPrError> {
        self.record(label)
            .ok_or_else(|| GptMyPrError::Prompt(format!("no scripted answer for {label}")))
    }

    async fn select(
        &self,
        label: &str,
        _choices: &[&str],
        default: &str,
    ) -> Result<String, GptMyPrError> {
        Ok(self.record(label).unwrap_or_else(|| default.to_string()))
    }
}
