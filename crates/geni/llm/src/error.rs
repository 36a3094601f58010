/// Errors from an LLM backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no scripted response left (call {0})")]
    ScriptExhausted(usize),

    #[error("{0}")]
    Other(String),
}
