use geni_types::ShapeError;

/// Why one sandboxed call produced no usable result.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("execution timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("execution failed: {0}")]
    Execution(String),

    #[error("result does not match the output shape: {0}")]
    SchemaMismatch(#[from] ShapeError),

    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("sandbox I/O error: {0}")]
    Io(String),
}

impl SandboxError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SandboxError::Timeout { .. })
    }
}

/// The type checker itself could not run. Diagnostics are not errors.
#[derive(Debug, thiserror::Error)]
pub enum TypeCheckError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("type checker timed out after {0}s")]
    Timeout(u64),

    #[error("type checker I/O error: {0}")]
    Io(String),

    #[error("type checker exited with status {status} without judging the file: {output}")]
    Failed { status: i32, output: String },
}
