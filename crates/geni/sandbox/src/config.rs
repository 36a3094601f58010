use serde::{Deserialize, Serialize};

/// How candidates are executed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Runtime binary.
    pub program: String,
    /// Arguments placed before the harness path.
    pub args: Vec<String>,
    /// Captured output beyond this many characters is cut from error messages.
    pub max_output_chars: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            program: "deno".to_string(),
            args: vec![
                "run".to_string(),
                "--quiet".to_string(),
                "--no-prompt".to_string(),
            ],
            max_output_chars: 2000,
        }
    }
}

impl SandboxConfig {
    /// Run harnesses with `node --experimental-strip-types` instead of Deno.
    ///
    /// Node grants file and network access to scripts; only use this where
    /// Deno is unavailable.
    pub fn node() -> Self {
        Self {
            program: "node".to_string(),
            args: vec![
                "--experimental-strip-types".to_string(),
                "--no-warnings".to_string(),
            ],
            ..Self::default()
        }
    }
}

/// How candidates are type checked.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeCheckerConfig {
    pub program: String,
    /// Arguments placed before the file name.
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for TypeCheckerConfig {
    fn default() -> Self {
        Self {
            program: "tsc".to_string(),
            args: vec![
                "--noEmit".to_string(),
                "--pretty".to_string(),
                "false".to_string(),
                "--strict".to_string(),
                "--target".to_string(),
                "es2022".to_string(),
                "--skipLibCheck".to_string(),
            ],
            timeout_secs: 60,
        }
    }
}
