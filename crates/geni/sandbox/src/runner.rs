use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geni_types::Shape;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::harness::{self, HarnessOutcome};

/// Executes one call of a candidate outside the caller's process.
#[async_trait]
pub trait SandboxRunner: Send + Sync {
    /// Run `wrapper(...args)` from `source` and decode the result against
    /// `output`. The call is abandoned after `timeout`.
    async fn run(
        &self,
        source: &str,
        args: &[Value],
        output: &Shape,
        timeout: Duration,
    ) -> Result<Value, SandboxError>;
}

/// Spawns a fresh runtime child per call.
///
/// The harness is written into its own temporary directory, which is removed
/// when the call returns. A child still running at the deadline is killed.
#[derive(Clone, Debug, Default)]
pub struct ProcessSandbox {
    config: SandboxConfig,
}

impl ProcessSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }
}

#[async_trait]
impl SandboxRunner for ProcessSandbox {
    async fn run(
        &self,
        source: &str,
        args: &[Value],
        output: &Shape,
        timeout: Duration,
    ) -> Result<Value, SandboxError> {
        let script = harness::build_harness(source, args)?;
        let dir = tempfile::tempdir().map_err(|e| SandboxError::Io(e.to_string()))?;
        let script_path = dir.path().join("harness.ts");
        tokio::fs::write(&script_path, script)
            .await
            .map_err(|e| SandboxError::Io(e.to_string()))?;

        let child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(&script_path)
            .current_dir(dir.path())
            .env("DENO_NO_UPDATE_CHECK", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn {
                program: self.config.program.clone(),
                message: e.to_string(),
            })?;

        let started = std::time::Instant::now();
        let result = tokio::time::timeout(timeout, child.wait_with_output()).await;
        let finished = match result {
            Ok(Ok(finished)) => finished,
            Ok(Err(e)) => return Err(SandboxError::Io(e.to_string())),
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Sandbox call timed out");
                return Err(SandboxError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        };
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            status = ?finished.status.code(),
            "Sandbox call finished"
        );

        let stdout = String::from_utf8_lossy(&finished.stdout);
        let stderr = String::from_utf8_lossy(&finished.stderr);
        match harness::parse_outcome(&stdout) {
            Some(Ok(HarnessOutcome::Ok(value))) => Ok(output.decode(&value)?),
            Some(Ok(HarnessOutcome::Error(message))) => Err(SandboxError::Execution(message)),
            Some(Err(e)) => Err(e),
            None => Err(SandboxError::Execution(format!(
                "no result (exit status {}): {}",
                finished
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                harness::truncate(&stderr, self.config.max_output_chars)
            ))),
        }
    }
}

type Handler = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

#[derive(Clone)]
enum Behavior {
    Compute(Handler),
    Hang,
}

/// In-process stand-in for [`ProcessSandbox`].
///
/// Behaviours are keyed by a marker substring of the candidate source; the
/// first matching marker decides the call. Results still pass through shape
/// decoding, and hanging candidates respect the timeout.
#[derive(Clone, Default)]
pub struct SimulatedSandbox {
    behaviors: Vec<(String, Behavior)>,
    calls: Arc<AtomicUsize>,
}

impl SimulatedSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources containing `marker` compute their result with `handler`.
    /// An `Err` from the handler plays the part of a thrown exception.
    pub fn with_handler<F>(mut self, marker: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.behaviors
            .push((marker.into(), Behavior::Compute(Arc::new(handler))));
        self
    }

    /// Sources containing `marker` always return `value`.
    pub fn with_constant(self, marker: impl Into<String>, value: Value) -> Self {
        self.with_handler(marker, move |_| Ok(value.clone()))
    }

    /// Sources containing `marker` never return.
    pub fn with_hang(mut self, marker: impl Into<String>) -> Self {
        self.behaviors.push((marker.into(), Behavior::Hang));
        self
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SandboxRunner for SimulatedSandbox {
    async fn run(
        &self,
        source: &str,
        args: &[Value],
        output: &Shape,
        timeout: Duration,
    ) -> Result<Value, SandboxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .behaviors
            .iter()
            .find(|(marker, _)| source.contains(marker.as_str()))
            .map(|(_, behavior)| behavior.clone());

        match behavior {
            Some(Behavior::Compute(handler)) => {
                let value = handler(args).map_err(SandboxError::Execution)?;
                Ok(output.decode(&value)?)
            }
            Some(Behavior::Hang) => {
                tokio::time::sleep(timeout).await;
                Err(SandboxError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
            None => Err(SandboxError::Execution("wrapper is not defined".to_string())),
        }
    }
}
