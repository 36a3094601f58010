use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LlmError;

/// A completion backend: one prompt in, one raw completion out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn request(&self, prompt: &str) -> Result<String, LlmError>;

    /// Short name for log lines.
    fn name(&self) -> &str {
        "llm"
    }
}

/// Replays queued responses in order and records every prompt it sees.
///
/// Once the queue is drained the fallback response (if any) is repeated;
/// without one, further calls fail with [`LlmError::ScriptExhausted`].
#[derive(Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the given responses.
    pub fn with_responses<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        let llm = Self::new();
        for response in responses {
            llm.push_response(response);
        }
        llm
    }

    /// Answer every call with the same completion.
    pub fn repeating(response: impl Into<String>) -> Self {
        Self {
            fallback: Some(response.into()),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response.into()));
        }
    }

    pub fn push_failure(&self, error: LlmError) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn request(&self, prompt: &str) -> Result<String, LlmError> {
        let call = {
            let mut prompts = self
                .prompts
                .lock()
                .map_err(|_| LlmError::Other("lock poisoned".into()))?;
            prompts.push(prompt.to_string());
            prompts.len()
        };
        let next = self
            .responses
            .lock()
            .map_err(|_| LlmError::Other("lock poisoned".into()))?
            .pop_front();
        match (next, &self.fallback) {
            (Some(response), _) => response,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(LlmError::ScriptExhausted(call)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always fails; used to exercise error paths.
pub struct FailingLlm {
    message: String,
}

impl FailingLlm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingLlm {
    fn default() -> Self {
        Self::new("backend unavailable")
    }
}

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn request(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Transport(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
