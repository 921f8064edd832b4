// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Language-Model Provider Contract
// ─────────────────────────────────────────────────────────────────────

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use arbiter_types::ProviderError;

/// Structured and free-text completion backend.
///
/// Implementations classify their failures with [`ProviderError`] so the
/// retry runner can tell transient errors from malformed output.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete `prompt` into a JSON value shaped by `schema`.
    async fn complete_json(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError>;

    /// Complete `prompt` into plain text.
    async fn complete_text(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Scripted provider that replays queued responses in order.
///
/// JSON and text completions have separate queues. Every prompt is
/// recorded. An exhausted queue answers with a schema error, which is
/// never retried.
#[derive(Default)]
pub struct ReplayProvider {
    json: Mutex<VecDeque<Result<Value, ProviderError>>>,
    text: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ReplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, value: Value) -> Self {
        self.json.lock().push_back(Ok(value));
        self
    }

    pub fn with_json_error(self, err: ProviderError) -> Self {
        self.json.lock().push_back(Err(err));
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.text.lock().push_back(Ok(text.into()));
        self
    }

    pub fn with_text_error(self, err: ProviderError) -> Self {
        self.text.lock().push_back(Err(err));
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn remaining_json(&self) -> usize {
        self.json.lock().len()
    }

    pub fn remaining_text(&self) -> usize {
        self.text.lock().len()
    }
}

#[async_trait]
impl LlmProvider for ReplayProvider {
    async fn complete_json(&self, prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        self.json
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Schema("replay JSON script exhausted".into())))
    }

    async fn complete_text(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());
        self.text
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Schema("replay text script exhausted".into())))
    }
}
