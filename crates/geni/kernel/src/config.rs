use std::path::PathBuf;
use std::time::Duration;

use geni_llm::LlmConfig;
use geni_sandbox::{SandboxConfig, TypeCheckerConfig};
use serde::{Deserialize, Serialize};

/// Pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeniConfig {
    /// Directory holding one attempt directory per fingerprint.
    pub cache_root: PathBuf,
    /// LLM generations allowed per `synthesize` call.
    pub max_attempts: u32,
    /// Wall-clock limit for one sandboxed test run (ms).
    pub test_timeout_ms: u64,
    pub sandbox: SandboxConfig,
    pub type_checker: TypeCheckerConfig,
    pub llm: LlmConfig,
}

impl Default for GeniConfig {
    fn default() -> Self {
        Self {
            cache_root: PathBuf::from(".geni"),
            max_attempts: 5,
            test_timeout_ms: 3000,
            sandbox: SandboxConfig::default(),
            type_checker: TypeCheckerConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl GeniConfig {
    /// Fewer, faster attempts for interactive use.
    pub fn quick() -> Self {
        Self {
            max_attempts: 2,
            test_timeout_ms: 1000,
            ..Self::default()
        }
    }

    /// More attempts and slack for hard tasks.
    pub fn thorough() -> Self {
        Self {
            max_attempts: 10,
            test_timeout_ms: 10_000,
            ..Self::default()
        }
    }

    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_test_timeout_ms(mut self, test_timeout_ms: u64) -> Self {
        self.test_timeout_ms = test_timeout_ms;
        self
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }
}
