use std::path::{Component, Path};

use async_trait::async_trait;

use crate::error::StorageError;

/// Pluggable storage backend.
///
/// Paths are relative to [`Storage::root`]; absolute paths and `..`
/// components are rejected with [`StorageError::InvalidPath`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// The working root all paths resolve against.
    fn root(&self) -> &Path;

    /// Create a directory and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;

    /// Whether a file or directory exists at `path`.
    async fn exists(&self, path: &Path) -> Result<bool, StorageError>;

    /// Read a whole file as UTF-8.
    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError>;

    /// Replace a file's contents. The parent directory must exist.
    async fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError>;

    /// Remove a file, or a directory with everything below it.
    async fn remove(&self, path: &Path) -> Result<(), StorageError>;

    /// Names of the direct children of a directory, sorted.
    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, StorageError>;
}

/// Reject paths that would escape the storage root.
pub fn validate_relative(path: &Path) -> Result<(), StorageError> {
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StorageError::InvalidPath(path.to_path_buf()));
    }
    Ok(())
}
