use std::sync::Arc;

use geni_llm::LlmProvider;
use geni_types::{FeedbackRecord, Shape};
use tracing::debug;

use crate::error::GenerationError;
use crate::prompt_builder::PromptBuilder;

/// Asks the LLM for a candidate and appends the typed adapter.
///
/// One call, one request: retrying is the orchestrator's job.
#[derive(Clone)]
pub struct CodeGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl CodeGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub async fn generate(
        &self,
        description: &str,
        inputs: &[Shape],
        output: &Shape,
        feedback: &[FeedbackRecord],
    ) -> Result<String, GenerationError> {
        let prompt = if feedback.is_empty() {
            PromptBuilder::build_prompt(description, inputs, output)
        } else {
            PromptBuilder::build_retry_prompt(description, inputs, output, feedback)
        };
        debug!(
            provider = self.llm.name(),
            feedback = feedback.len(),
            prompt_chars = prompt.len(),
            "Requesting candidate"
        );

        let raw = self.llm.request(&prompt).await?;
        let function = strip_code_fences(&raw);
        Ok(format!("{}\n{}", function, adapter(inputs, output)))
    }
}

/// `const wrapper: (arg0: A, arg1: B) => Out = main;`
pub fn adapter(inputs: &[Shape], output: &Shape) -> String {
    let params = inputs
        .iter()
        .enumerate()
        .map(|(i, shape)| format!("arg{}: {}", i, shape))
        .collect::<Vec<_>>()
        .join(", ");
    format!("const wrapper: ({}) => {} = main;", params, output)
}

/// Take the body of the first fenced block, or the whole text when the
/// model followed the plain-text instruction.
pub fn strip_code_fences(raw: &str) -> String {
    let Some(open) = raw.find("```") else {
        return raw.trim().to_string();
    };
    let after_open = &raw[open + 3..];
    // The rest of the opening line is the language tag.
    let body = match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => return raw.trim().to_string(),
    };
    let body = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    body.trim().to_string()
}
