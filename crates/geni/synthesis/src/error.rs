use geni_llm::LlmError;

/// Errors from producing a candidate.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),
}
