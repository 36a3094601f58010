use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::storage::{validate_relative, Storage};

#[derive(Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
}

/// In-memory storage for testing and development.
///
/// Clones share the same underlying tree.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    root: PathBuf,
    tree: Arc<RwLock<Tree>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every file currently stored, sorted by path.
    pub fn files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let tree = self.read()?;
        Ok(tree.files.keys().cloned().collect())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tree>, StorageError> {
        self.tree.read().map_err(|e| StorageError::Io {
            path: PathBuf::new(),
            message: format!("lock poisoned: {}", e),
        })
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tree>, StorageError> {
        self.tree.write().map_err(|e| StorageError::Io {
            path: PathBuf::new(),
            message: format!("lock poisoned: {}", e),
        })
    }
}

fn normalize(path: &Path) -> Result<PathBuf, StorageError> {
    validate_relative(path)?;
    Ok(path
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect())
}

impl Tree {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let path = normalize(path)?;
        let mut tree = self.write_lock()?;
        if tree.files.contains_key(&path) {
            return Err(StorageError::Io {
                path,
                message: "a file exists at this path".into(),
            });
        }
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                tree.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool, StorageError> {
        let path = normalize(path)?;
        let tree = self.read()?;
        Ok(tree.is_dir(&path) || tree.files.contains_key(&path))
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        let path = normalize(path)?;
        let tree = self.read()?;
        tree.files
            .get(&path)
            .cloned()
            .ok_or(StorageError::NotFound(path))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), StorageError> {
        let path = normalize(path)?;
        let mut tree = self.write_lock()?;
        let parent = path.parent().unwrap_or(Path::new("")).to_path_buf();
        if !tree.is_dir(&parent) {
            return Err(StorageError::NotFound(parent));
        }
        tree.files.insert(path, contents.to_string());
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), StorageError> {
        let path = normalize(path)?;
        let mut tree = self.write_lock()?;
        if tree.files.remove(&path).is_some() {
            return Ok(());
        }
        if !tree.dirs.contains(&path) {
            return Err(StorageError::NotFound(path));
        }
        tree.dirs.retain(|d| !d.starts_with(&path));
        tree.files.retain(|f, _| !f.starts_with(&path));
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let path = normalize(path)?;
        let tree = self.read()?;
        if !tree.is_dir(&path) {
            return Err(StorageError::NotFound(path));
        }
        let children = tree
            .dirs
            .iter()
            .chain(tree.files.keys())
            .filter(|p| p.parent() == Some(path.as_path()))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());
        let mut names: Vec<String> = children.collect();
        names.sort();
        Ok(names)
    }
}
