//! Shared fixtures for the end-to-end suites.
//!
//! [`Rig`] wires a [`Geni`] from in-process doubles: scripted LLM
//! completions, in-memory storage and a simulated sandbox that recognises
//! the candidate sources below by marker.

use std::sync::Arc;
use std::time::Duration;

use geni_kernel::{Geni, GeniConfig};
use geni_llm::ScriptedLlm;
use geni_sandbox::{AcceptAllChecker, SimulatedSandbox, TypeChecker};
use geni_storage::InMemoryStorage;
use geni_types::{Shape, TaskSpec};
use serde_json::{json, Value};

pub const FLATTEN: &str = "function main(arr: ReadonlyArray<ReadonlyArray<number>>): \
    ReadonlyArray<number> {\n  return arr.flat();\n}";

/// Keeps only the first element of each row.
pub const FLATTEN_FIRSTS: &str = "function main(arr: ReadonlyArray<ReadonlyArray<number>>): \
    ReadonlyArray<number> {\n  return arr.map((row) => row[0]);\n}";

/// Never returns.
pub const FLATTEN_SPIN: &str = "function main(arr: ReadonlyArray<ReadonlyArray<number>>): \
    ReadonlyArray<number> {\n  while (true) {}\n}";

pub const CONCAT: &str = "function main(n: number, s: string): string {\n  return s + n;\n}";

/// Puts the number first.
pub const CONCAT_REVERSED: &str =
    "function main(n: number, s: string): string {\n  return n + s;\n}";

/// Throws on empty strings.
pub const CONCAT_STRICT: &str = "function main(n: number, s: string): string {\n  \
    if (s.length === 0) throw new Error(\"empty string\");\n  return s + n;\n}";

pub fn flatten_task() -> TaskSpec {
    TaskSpec::new(
        "Flatten an array",
        vec![Shape::array(Shape::array(Shape::Number))],
        Shape::array(Shape::Number),
    )
    .with_test(vec![json!([[1, 2, 3], [4, 5, 6]])], json!([1, 2, 3, 4, 5, 6]))
}

pub fn concat_task() -> TaskSpec {
    TaskSpec::new(
        "Append number to the string",
        vec![Shape::Number, Shape::String],
        Shape::String,
    )
    .with_test(vec![json!(13), json!("Hello")], json!("Hello13"))
}

fn rows(args: &[Value]) -> Result<Vec<Vec<Value>>, String> {
    let outer = args
        .first()
        .and_then(Value::as_array)
        .ok_or("arr is not an array")?;
    Ok(outer
        .iter()
        .map(|row| row.as_array().cloned().unwrap_or_default())
        .collect())
}

fn concat_args(args: &[Value]) -> Result<(String, String), String> {
    let n = args.first().ok_or("missing n")?.to_string();
    let s = args
        .get(1)
        .and_then(Value::as_str)
        .ok_or("s is not a string")?
        .to_string();
    Ok((n, s))
}

/// Simulated runtime that understands every candidate above.
pub fn sandbox() -> SimulatedSandbox {
    SimulatedSandbox::new()
        .with_handler("arr.flat()", |args| {
            Ok(Value::Array(rows(args)?.into_iter().flatten().collect()))
        })
        .with_handler("row[0]", |args| {
            Ok(Value::Array(
                rows(args)?
                    .into_iter()
                    .map(|row| row.into_iter().next().unwrap_or(Value::Null))
                    .collect(),
            ))
        })
        .with_hang("while (true)")
        .with_handler("throw new Error", |args| {
            let (n, s) = concat_args(args)?;
            if s.is_empty() {
                return Err("empty string".to_string());
            }
            Ok(json!(format!("{s}{n}")))
        })
        .with_handler("return s + n", |args| {
            let (n, s) = concat_args(args)?;
            Ok(json!(format!("{s}{n}")))
        })
        .with_handler("return n + s", |args| {
            let (n, s) = concat_args(args)?;
            Ok(json!(format!("{n}{s}")))
        })
}

/// A [`Geni`] over in-process doubles, plus handles to inspect them.
pub struct Rig {
    pub llm: Arc<ScriptedLlm>,
    pub storage: Arc<InMemoryStorage>,
    pub sandbox: SimulatedSandbox,
    pub geni: Geni,
}

impl Rig {
    pub fn config() -> GeniConfig {
        GeniConfig::default().with_test_timeout_ms(200)
    }

    pub fn new(llm: ScriptedLlm) -> Self {
        Self::with_parts(
            llm,
            Arc::new(InMemoryStorage::new()),
            Self::config(),
            Arc::new(AcceptAllChecker),
        )
    }

    pub fn with_parts(
        llm: ScriptedLlm,
        storage: Arc<InMemoryStorage>,
        config: GeniConfig,
        checker: Arc<dyn TypeChecker>,
    ) -> Self {
        let llm = Arc::new(llm);
        let sandbox = sandbox();
        let geni = Geni::new(
            config,
            llm.clone(),
            storage.clone(),
            checker,
            Arc::new(sandbox.clone()),
        );
        Self {
            llm,
            storage,
            sandbox,
            geni,
        }
    }

    /// A fresh orchestrator and LLM over the same storage, as a second
    /// process run would see it.
    pub fn reopen(&self, llm: ScriptedLlm) -> Self {
        Self::with_parts(
            llm,
            self.storage.clone(),
            Self::config(),
            Arc::new(AcceptAllChecker),
        )
    }

    /// Attempt files currently stored for `task`, by file name.
    pub fn attempt_files(&self, task: &TaskSpec) -> Vec<String> {
        let dir = self.geni.store().attempts_dir(&task.fingerprint());
        self.storage
            .files()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    pub fn test_timeout(&self) -> Duration {
        self.geni.config().test_timeout()
    }
}
