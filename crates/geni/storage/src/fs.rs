use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::StorageError;
use crate::storage::{validate_relative, Storage};

/// Filesystem storage rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, StorageError> {
        validate_relative(path)?;
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl Storage for FsStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn exists(&self, path: &Path) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::try_exists(&full)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        // Write to a sibling temp file, then rename over the target.
        let mut tmp_name = full.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = full.with_file_name(tmp_name);
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        tokio::fs::rename(&tmp, &full)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        let meta = tokio::fs::metadata(&full)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        let result = if meta.is_dir() {
            tokio::fs::remove_dir_all(&full).await
        } else {
            tokio::fs::remove_file(&full).await
        };
        result.map_err(|e| StorageError::from_io(path, e))
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let full = self.resolve(path)?;
        let mut entries = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| StorageError::from_io(path, e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::from_io(path, e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
