use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fingerprint::Fingerprint;
use crate::shape::Shape;

/// One example the synthesized function must reproduce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Positional arguments, one per input shape.
    pub input: Vec<Value>,
    /// Expected return value.
    pub output: Value,
}

impl TestCase {
    pub fn new(input: Vec<Value>, output: Value) -> Self {
        Self { input, output }
    }
}

/// A complete synthesis request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    pub inputs: Vec<Shape>,
    pub output: Shape,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

impl TaskSpec {
    pub fn new(description: impl Into<String>, inputs: Vec<Shape>, output: Shape) -> Self {
        Self {
            description: description.into(),
            inputs,
            output,
            tests: Vec::new(),
        }
    }

    pub fn with_test(mut self, input: Vec<Value>, output: Value) -> Self {
        self.tests.push(TestCase::new(input, output));
        self
    }

    pub fn with_tests(mut self, tests: impl IntoIterator<Item = TestCase>) -> Self {
        self.tests.extend(tests);
        self
    }

    /// Tests do not take part in the fingerprint; a changed test set is
    /// caught by re-validation instead.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_task(&self.description, &self.inputs, &self.output)
    }
}
