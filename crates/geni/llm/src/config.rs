use serde::{Deserialize, Serialize};

/// Supported completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmBackend {
    /// Any `/chat/completions` compatible endpoint.
    #[default]
    OpenAi,
    Anthropic,
    /// A local Ollama server (`/api/generate`).
    Ollama,
}

/// Configuration for the LLM backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub model: String,
    /// Override of the backend's default endpoint. Required for Ollama.
    pub endpoint: Option<String>,
    /// Never written back out when the config is serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::OpenAi,
            model: "gpt-4o-mini".to_string(),
            endpoint: None,
            api_key: None,
            temperature: Some(0.2),
            max_tokens: Some(2048),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn open_ai(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn anthropic(model: impl Into<String>) -> Self {
        Self {
            backend: LlmBackend::Anthropic,
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn ollama(model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            backend: LlmBackend::Ollama,
            model: model.into(),
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self.backend, LlmBackend::Ollama)
    }

    pub fn is_configured(&self) -> bool {
        if self.requires_api_key() {
            self.api_key
                .as_ref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false)
        } else {
            self.endpoint.is_some()
        }
    }
}
