//! Per-task attempt files.
//!
//! Layout under the storage root:
//!
//! ```text
//! <fingerprint>/temp/attempt_0.ts
//! <fingerprint>/temp/attempt_1.ts
//! <fingerprint>/final.ts
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use geni_storage::{Storage, StorageError};
use geni_types::{Fingerprint, Shape, TestCase, ValidatedAttempt};
use tracing::debug;

use crate::error::GeniError;
use crate::validator::Validator;

const ATTEMPT_DIR: &str = "temp";
const ATTEMPT_PREFIX: &str = "attempt_";
const SOURCE_EXTENSION: &str = "ts";
const FINAL_FILE: &str = "final.ts";

/// Owns every attempt and the final artifact of every task.
#[derive(Clone)]
pub struct AttemptStore {
    storage: Arc<dyn Storage>,
}

impl AttemptStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn task_dir(&self, fp: &Fingerprint) -> PathBuf {
        PathBuf::from(fp.to_hex())
    }

    pub fn attempts_dir(&self, fp: &Fingerprint) -> PathBuf {
        self.task_dir(fp).join(ATTEMPT_DIR)
    }

    pub fn attempt_path(&self, fp: &Fingerprint, index: u64) -> PathBuf {
        self.attempts_dir(fp)
            .join(format!("{ATTEMPT_PREFIX}{index}.{SOURCE_EXTENSION}"))
    }

    pub fn final_path(&self, fp: &Fingerprint) -> PathBuf {
        self.task_dir(fp).join(FINAL_FILE)
    }

    /// Stored attempt files as `(ordinal, path)`, ascending by ordinal and
    /// then by file name. Files sharing an ordinal are all kept.
    async fn attempt_files(&self, fp: &Fingerprint) -> Result<Vec<(u64, PathBuf)>, StorageError> {
        let dir = self.attempts_dir(fp);
        if !self.storage.exists(&dir).await? {
            return Ok(Vec::new());
        }
        let mut files: Vec<(u64, String)> = self
            .storage
            .list_dir(&dir)
            .await?
            .into_iter()
            .filter_map(|name| parse_index(&name).map(|i| (i, name)))
            .collect();
        files.sort();
        Ok(files
            .into_iter()
            .map(|(index, name)| (index, dir.join(name)))
            .collect())
    }

    /// Every stored attempt as `(ordinal, path, source)`, where `path` is
    /// the file as listed.
    async fn stored_attempts(
        &self,
        fp: &Fingerprint,
    ) -> Result<Vec<(u64, PathBuf, String)>, StorageError> {
        let mut attempts = Vec::new();
        for (index, path) in self.attempt_files(fp).await? {
            let source = self.storage.read_to_string(&path).await?;
            attempts.push((index, path, source));
        }
        Ok(attempts)
    }

    /// Every stored attempt as `(ordinal, source)`, ascending by ordinal.
    pub async fn list_attempts(
        &self,
        fp: &Fingerprint,
    ) -> Result<Vec<(u64, String)>, StorageError> {
        Ok(self
            .stored_attempts(fp)
            .await?
            .into_iter()
            .map(|(index, _, source)| (index, source))
            .collect())
    }

    /// Re-validate every stored attempt concurrently. Results are in
    /// ordinal order; stored sources are never modified.
    pub async fn validate_all_attempts(
        &self,
        validator: &Validator,
        fp: &Fingerprint,
        output: &Shape,
        tests: &[TestCase],
    ) -> Result<Vec<ValidatedAttempt>, GeniError> {
        let attempts = self.stored_attempts(fp).await?;
        debug!(fingerprint = %fp, attempts = attempts.len(), "Re-validating stored attempts");

        let checks = attempts.into_iter().map(|(index, path, source)| async move {
            let verdict = validator
                .validate_source(&path, &source, output, tests)
                .await?;
            Ok::<_, GeniError>(ValidatedAttempt {
                index,
                source,
                verdict,
            })
        });
        join_all(checks).await.into_iter().collect()
    }

    /// Write attempt `index`, creating the attempt directory if needed.
    pub async fn persist_attempt(
        &self,
        fp: &Fingerprint,
        index: u64,
        source: &str,
    ) -> Result<PathBuf, StorageError> {
        self.storage.create_dir_all(&self.attempts_dir(fp)).await?;
        let path = self.attempt_path(fp, index);
        self.storage.write(&path, source).await?;
        debug!(fingerprint = %fp, attempt = index, "Persisted attempt");
        Ok(path)
    }

    /// Write the final artifact, replacing any previous one.
    pub async fn promote_final(
        &self,
        fp: &Fingerprint,
        source: &str,
    ) -> Result<PathBuf, StorageError> {
        self.storage.create_dir_all(&self.task_dir(fp)).await?;
        let path = self.final_path(fp);
        self.storage.write(&path, source).await?;
        Ok(path)
    }

    /// One past the highest stored ordinal, or 0.
    pub async fn next_index(&self, fp: &Fingerprint) -> Result<u64, StorageError> {
        Ok(self
            .attempt_files(fp)
            .await?
            .last()
            .map(|(i, _)| i + 1)
            .unwrap_or(0))
    }

    pub async fn has_final(&self, fp: &Fingerprint) -> Result<bool, StorageError> {
        self.storage.exists(&self.final_path(fp)).await
    }

    /// The final artifact's source, if one was promoted.
    pub async fn load_final(&self, fp: &Fingerprint) -> Result<Option<String>, StorageError> {
        match self.storage.read_to_string(&self.final_path(fp)).await {
            Ok(source) => Ok(Some(source)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

/// Trailing number of a file name, ignoring the extension.
fn parse_index(name: &str) -> Option<u64> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}
