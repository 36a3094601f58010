use geni_llm::LlmError;
use geni_sandbox::{SandboxError, TypeCheckError};
use geni_storage::StorageError;
use geni_types::ShapeError;

/// Errors from [`crate::Geni::synthesize`].
///
/// A failed validation is never an error; it becomes feedback for the next
/// attempt.
#[derive(Debug, thiserror::Error)]
pub enum GeniError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("type checker failed: {0}")]
    TypeCheck(#[from] TypeCheckError),

    #[error("no passing function after {attempts} attempts; last error: {last_diagnostic}")]
    GenerationExhausted {
        attempts: u32,
        last_diagnostic: String,
    },

    /// The LLM backend could not be set up.
    #[error("LLM backend: {0}")]
    Llm(#[from] LlmError),
}

/// Errors from calling a [`crate::Runnable`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("expected {expected} arguments, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("argument {index} does not match its shape: {source}")]
    Argument {
        index: usize,
        #[source]
        source: ShapeError,
    },

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("cannot deserialize result: {0}")]
    Deserialize(#[from] serde_json::Error),
}
