use std::sync::Arc;
use std::time::Duration;

use geni_sandbox::SandboxRunner;
use geni_types::{Fingerprint, Shape};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::RunError;

/// A validated function, callable through the sandbox.
#[derive(Clone)]
pub struct Runnable {
    fingerprint: Fingerprint,
    source: Arc<str>,
    inputs: Vec<Shape>,
    output: Shape,
    sandbox: Arc<dyn SandboxRunner>,
    timeout: Duration,
}

impl Runnable {
    pub fn new(
        fingerprint: Fingerprint,
        source: impl Into<Arc<str>>,
        inputs: Vec<Shape>,
        output: Shape,
        sandbox: Arc<dyn SandboxRunner>,
        timeout: Duration,
    ) -> Self {
        Self {
            fingerprint,
            source: source.into(),
            inputs,
            output,
            sandbox,
            timeout,
        }
    }

    /// Per-call wall-clock limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Generated function plus its adapter.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn inputs(&self) -> &[Shape] {
        &self.inputs
    }

    pub fn output(&self) -> &Shape {
        &self.output
    }

    /// Call with one JSON value per input shape.
    ///
    /// Arguments are checked against their shapes before anything is
    /// spawned; the result is decoded against the output shape.
    pub async fn call(&self, args: &[Value]) -> Result<Value, RunError> {
        if args.len() != self.inputs.len() {
            return Err(RunError::Arity {
                expected: self.inputs.len(),
                found: args.len(),
            });
        }
        let args = self
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(index, (shape, arg))| {
                shape
                    .decode(arg)
                    .map_err(|source| RunError::Argument { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(fingerprint = %self.fingerprint, args = args.len(), "Calling synthesized function");
        Ok(self
            .sandbox
            .run(&self.source, &args, &self.output, self.timeout)
            .await?)
    }

    /// [`Runnable::call`], then deserialize the result into `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, args: &[Value]) -> Result<T, RunError> {
        let value = self.call(args).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for Runnable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runnable")
            .field("fingerprint", &self.fingerprint)
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .field("timeout", &self.timeout)
            .finish()
    }
}
