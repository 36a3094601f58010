use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use geni_sandbox::{SandboxRunner, TypeChecker};
use geni_storage::Storage;
use geni_types::{deep_equal, Shape, TestCase, Verdict};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::GeniError;

/// Prefix put in front of the diagnostic of a final artifact that no
/// longer validates.
pub const OUTDATED_PREFIX: &str = "Cached function is outdated. Need to regenerate one. See error: ";

#[derive(Serialize)]
struct FailedCase<'a> {
    input: &'a [Value],
    expected: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Type checks a stored candidate and runs the task's tests against it.
#[derive(Clone)]
pub struct Validator {
    storage: Arc<dyn Storage>,
    checker: Arc<dyn TypeChecker>,
    sandbox: Arc<dyn SandboxRunner>,
    test_timeout: Duration,
}

impl Validator {
    pub fn new(
        storage: Arc<dyn Storage>,
        checker: Arc<dyn TypeChecker>,
        sandbox: Arc<dyn SandboxRunner>,
        test_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            checker,
            sandbox,
            test_timeout,
        }
    }

    pub fn test_timeout(&self) -> Duration {
        self.test_timeout
    }

    /// Validate the file at `path` (relative to the storage root).
    pub async fn validate(
        &self,
        path: &Path,
        output: &Shape,
        tests: &[TestCase],
    ) -> Result<Verdict, GeniError> {
        let source = self.storage.read_to_string(path).await?;
        self.validate_source(path, &source, output, tests).await
    }

    /// [`Validator::validate`] for the final artifact; a failure is marked
    /// as outdated.
    pub async fn validate_cached_function(
        &self,
        path: &Path,
        output: &Shape,
        tests: &[TestCase],
    ) -> Result<Verdict, GeniError> {
        let verdict = self.validate(path, output, tests).await?;
        Ok(verdict.map_diagnostic(|d| format!("{OUTDATED_PREFIX}{d}")))
    }

    /// Validate source already read from `path`.
    pub async fn validate_source(
        &self,
        path: &Path,
        source: &str,
        output: &Shape,
        tests: &[TestCase],
    ) -> Result<Verdict, GeniError> {
        let diagnostics = self.checker.check(path, source).await?;
        if !diagnostics.is_empty() {
            let messages = diagnostics
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            debug!(path = %path.display(), count = diagnostics.len(), "Type check failed");
            return Ok(Verdict::fail(format!("Type check failed: {messages}")));
        }

        let mut failed = Vec::new();
        for (i, test) in tests.iter().enumerate() {
            let outcome = self
                .sandbox
                .run(source, &test.input, output, self.test_timeout)
                .await;
            match outcome {
                Ok(actual) if deep_equal(&test.output, &actual) => {
                    debug!(path = %path.display(), test = i, "Test passed");
                }
                Ok(actual) => {
                    debug!(path = %path.display(), test = i, "Test produced a different value");
                    failed.push(FailedCase {
                        input: &test.input,
                        expected: &test.output,
                        actual: Some(actual),
                        error: None,
                    });
                }
                Err(e) => {
                    debug!(path = %path.display(), test = i, error = %e, "Test errored");
                    failed.push(FailedCase {
                        input: &test.input,
                        expected: &test.output,
                        actual: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        if failed.is_empty() {
            return Ok(Verdict::Pass);
        }
        let cases = serde_json::to_string(&failed)
            .unwrap_or_else(|e| format!("<unserializable: {e}>"));
        Ok(Verdict::fail(format!(
            "{}/{} tests failed. Failed test cases: {}",
            failed.len(),
            tests.len(),
            cases
        )))
    }
}
