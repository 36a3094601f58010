//! Static validation of one generated source file.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::config::TypeCheckerConfig;
use crate::error::TypeCheckError;
use crate::harness::truncate;

const DEFAULT_FILE_NAME: &str = "candidate.ts";

/// One type-checker diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the diagnostic belongs to, as reported by the checker.
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// e.g. `TS2322`.
    pub code: Option<String>,
    /// Message text, continuation lines joined with `\n`.
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            code: None,
            message: message.into(),
        }
    }
}

/// Type checks a single source file.
#[async_trait]
pub trait TypeChecker: Send + Sync {
    /// Diagnostics for `path` only; anything reported against other files
    /// (library declarations and the like) is dropped. An empty result
    /// means the file checks.
    async fn check(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>, TypeCheckError>;
}

/// Runs an external `tsc` over a private copy of the file.
#[derive(Clone, Debug, Default)]
pub struct CommandTypeChecker {
    config: TypeCheckerConfig,
}

impl CommandTypeChecker {
    pub fn new(config: TypeCheckerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TypeChecker for CommandTypeChecker {
    async fn check(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>, TypeCheckError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| n.ends_with(".ts"))
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let dir = tempfile::tempdir().map_err(|e| TypeCheckError::Io(e.to_string()))?;
        tokio::fs::write(dir.path().join(&file_name), source)
            .await
            .map_err(|e| TypeCheckError::Io(e.to_string()))?;

        let child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(&file_name)
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TypeCheckError::Spawn {
                program: self.config.program.clone(),
                message: e.to_string(),
            })?;

        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| TypeCheckError::Timeout(self.config.timeout_secs))?
        .map_err(|e| TypeCheckError::Io(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = parse_tsc_output(&stdout);
        debug!(
            file = %path.display(),
            diagnostics = diagnostics.len(),
            status = ?output.status.code(),
            "Type check finished"
        );

        let (own, other): (Vec<_>, Vec<_>) = diagnostics
            .into_iter()
            .partition(|d| d.file.as_deref() == Some(file_name.as_str()));

        // A failing run that says nothing about the file never judged it.
        if !output.status.success() && own.is_empty() {
            let global: Vec<&str> = other
                .iter()
                .filter(|d| d.file.is_none())
                .map(|d| d.message.as_str())
                .collect();
            let detail = if global.is_empty() {
                format!("{stdout}{stderr}")
            } else {
                global.join("\n")
            };
            return Err(TypeCheckError::Failed {
                status: output.status.code().unwrap_or(-1),
                output: truncate(&detail, 500),
            });
        }

        Ok(own)
    }
}

/// Parse `tsc --pretty false` output.
///
/// Diagnostics look like `file.ts(3,5): error TS2322: message`; indented
/// lines continue the previous message. Global diagnostics have no
/// location prefix.
pub fn parse_tsc_output(output: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut continuing = false;
    for line in output.lines() {
        if line.trim().is_empty() {
            continuing = false;
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let (true, Some(last)) = (continuing, diagnostics.last_mut()) {
                last.message.push('\n');
                last.message.push_str(line.trim());
            }
            continue;
        }
        continuing = match parse_line(line) {
            Some(diagnostic) => {
                diagnostics.push(diagnostic);
                true
            }
            None => false,
        };
    }
    diagnostics
}

fn parse_line(line: &str) -> Option<Diagnostic> {
    if let Some(rest) = line.strip_prefix("error ") {
        let (code, message) = split_code(rest)?;
        return Some(Diagnostic {
            code: Some(code),
            ..Diagnostic::new(message)
        });
    }

    let (location, rest) = line.split_once("): error ")?;
    let (file, position) = location.rsplit_once('(')?;
    let (line_no, column) = position.split_once(',')?;
    let (code, message) = split_code(rest)?;
    Some(Diagnostic {
        file: Some(file.to_string()),
        line: line_no.trim().parse().ok(),
        column: column.trim().parse().ok(),
        code: Some(code),
        message,
    })
}

fn split_code(rest: &str) -> Option<(String, String)> {
    let (code, message) = rest.split_once(": ")?;
    if !code.starts_with("TS") {
        return None;
    }
    Some((code.to_string(), message.trim().to_string()))
}

/// Accepts every source.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllChecker;

#[async_trait]
impl TypeChecker for AcceptAllChecker {
    async fn check(&self, _path: &Path, _source: &str) -> Result<Vec<Diagnostic>, TypeCheckError> {
        Ok(Vec::new())
    }
}

/// Reports a fixed diagnostic for every source containing a marker.
#[derive(Clone, Debug, Default)]
pub struct RejectingChecker {
    rules: Vec<(String, String)>,
}

impl RejectingChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every source with `message`.
    pub fn always(message: impl Into<String>) -> Self {
        Self::new().when("", message)
    }

    /// Reject sources containing `marker` with `message`.
    pub fn when(mut self, marker: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push((marker.into(), message.into()));
        self
    }
}

#[async_trait]
impl TypeChecker for RejectingChecker {
    async fn check(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>, TypeCheckError> {
        let file = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(self
            .rules
            .iter()
            .filter(|(marker, _)| source.contains(marker.as_str()))
            .map(|(_, message)| Diagnostic {
                file: file.clone(),
                ..Diagnostic::new(message.clone())
            })
            .collect())
    }
}
