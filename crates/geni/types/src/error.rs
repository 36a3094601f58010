/// Errors from decoding a JSON value against a [`crate::Shape`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected {expected} at {path}, found {found}")]
    Mismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("missing property '{field}' at {path}")]
    MissingField { path: String, field: String },
    #[error("expected {expected} elements at {path}, found {found}")]
    Length {
        path: String,
        expected: usize,
        found: usize,
    },
}

impl ShapeError {
    /// JSON path of the offending value.
    pub fn path(&self) -> &str {
        match self {
            ShapeError::Mismatch { path, .. }
            | ShapeError::MissingField { path, .. }
            | ShapeError::Length { path, .. } => path,
        }
    }
}
