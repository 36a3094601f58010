//! The script a candidate runs inside.
//!
//! The harness appends an invocation of `wrapper` to the candidate source.
//! Arguments travel as a JSON string literal; the outcome comes back as one
//! stdout line starting with [`RESULT_MARKER`] followed by either
//! `{"ok": <value>}` or `{"error": "<message>"}`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::SandboxError;

pub const RESULT_MARKER: &str = "__GENI_RESULT__";

/// What the harness reported on stdout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarnessOutcome {
    Ok(Value),
    Error(String),
}

/// Build the runnable script for one call.
pub fn build_harness(source: &str, args: &[Value]) -> Result<String, SandboxError> {
    let args_json = serde_json::to_string(args).map_err(|e| SandboxError::Io(e.to_string()))?;
    let args_literal =
        serde_json::to_string(&args_json).map_err(|e| SandboxError::Io(e.to_string()))?;

    Ok(format!(
        r#"{source}

const __geniArgs: unknown[] = JSON.parse({args_literal});
try {{
  const __geniResult = await (wrapper as (...args: unknown[]) => unknown)(...__geniArgs);
  console.log("{marker}" + JSON.stringify({{ ok: __geniResult === undefined ? null : __geniResult }}));
}} catch (__geniError) {{
  const message = __geniError instanceof Error ? __geniError.message : String(__geniError);
  console.log("{marker}" + JSON.stringify({{ error: message }}));
}}
"#,
        marker = RESULT_MARKER,
    ))
}

/// Find the last marked line in captured stdout.
pub fn parse_outcome(stdout: &str) -> Option<Result<HarnessOutcome, SandboxError>> {
    let line = stdout
        .lines()
        .rev()
        .find_map(|line| line.trim_end().strip_prefix(RESULT_MARKER))?;
    Some(
        serde_json::from_str::<HarnessOutcome>(line)
            .map_err(|e| SandboxError::Execution(format!("malformed harness output: {e}"))),
    )
}

/// Cut captured output for error messages.
pub fn truncate(value: &str, max_chars: usize) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
