//! HTTP completion backends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::LlmError;
use crate::provider::LlmProvider;

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MAX_TOKENS: u32 = 2048;
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

/// [`LlmProvider`] over a hosted or local HTTP backend.
pub struct HttpLlm {
    config: LlmConfig,
    client: Client,
}

impl HttpLlm {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if !config.is_configured() {
            let missing = if config.requires_api_key() {
                "api_key"
            } else {
                "endpoint"
            };
            return Err(LlmError::NotConfigured(format!(
                "{:?} backend requires {}",
                config.backend, missing
            )));
        }
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config.api_key.as_deref().ok_or_else(|| {
            LlmError::NotConfigured(format!("{:?} backend requires api_key", self.config.backend))
        })
    }

    async fn request_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let url = resolve_chat_endpoint(self.config.endpoint.as_deref(), DEFAULT_OPENAI_ENDPOINT);
        let mut payload = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        });
        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        let response = ensure_success(response).await?;

        let body: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        let choice = body
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("response did not include choices".into()))?;
        Ok(extract_text(&choice.message.content))
    }

    async fn request_anthropic(&self, prompt: &str) -> Result<String, LlmError> {
        let url =
            resolve_messages_endpoint(self.config.endpoint.as_deref(), DEFAULT_ANTHROPIC_ENDPOINT);
        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        });
        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key()?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        let response = ensure_success(response).await?;

        let body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(body
            .content
            .iter()
            .filter(|part| part.content_type == "text")
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn request_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("ollama backend requires endpoint".into()))?;
        let url = format!("{}/api/generate", endpoint.trim_end_matches('/'));

        let mut payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });
        let mut options = serde_json::Map::new();
        if let Some(temp) = self.config.temperature {
            options.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options.insert("num_predict".to_string(), json!(max_tokens));
        }
        if !options.is_empty() {
            payload["options"] = Value::Object(options);
        }

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        let response = ensure_success(response).await?;

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(body.response)
    }
}

#[async_trait]
impl LlmProvider for HttpLlm {
    async fn request(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(
            backend = ?self.config.backend,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "Sending completion request"
        );
        let output = match self.config.backend {
            LlmBackend::OpenAi => self.request_openai(prompt).await?,
            LlmBackend::Anthropic => self.request_anthropic(prompt).await?,
            LlmBackend::Ollama => self.request_ollama(prompt).await?,
        };
        Ok(output.trim().to_string())
    }

    fn name(&self) -> &str {
        match self.config.backend {
            LlmBackend::OpenAi => "openai",
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::Ollama => "ollama",
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    let mut builder = Client::builder().timeout(timeout);
    let allow_system_proxy = std::env::var("GENI_USE_SYSTEM_PROXY")
        .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if !allow_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {}", e)))
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Status {
        status: status.as_u16(),
        body: truncate(&body, 320),
    })
}

fn resolve_chat_endpoint(endpoint: Option<&str>, default_endpoint: &str) -> String {
    let endpoint = endpoint.unwrap_or(default_endpoint);
    if endpoint.contains("/chat/completions") {
        endpoint.to_string()
    } else {
        format!("{}/chat/completions", endpoint.trim_end_matches('/'))
    }
}

fn resolve_messages_endpoint(endpoint: Option<&str>, default_endpoint: &str) -> String {
    let endpoint = endpoint.unwrap_or(default_endpoint);
    if endpoint.ends_with("/messages") {
        endpoint.to_string()
    } else {
        format!("{}/messages", endpoint.trim_end_matches('/'))
    }
}

fn extract_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
