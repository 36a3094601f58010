use std::path::{Path, PathBuf};

/// Errors from storage backends.
#[derive(Clone, Debug, thiserror::Error)]
pub enum StorageError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid storage path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("storage I/O error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl StorageError {
    /// Translate an I/O error, keeping "not found" distinguishable.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
