#![deny(unsafe_code)]
//! # geni-llm
//!
//! The one-method capability the code generator talks to.
//!
//! ## Key Types
//!
//! - [`LlmProvider`]: `request(prompt) -> completion`
//! - [`HttpLlm`]: OpenAI-compatible, Anthropic and Ollama backends over `reqwest`
//! - [`LlmConfig`]: backend selection, model and sampling settings
//! - [`ScriptedLlm`] / [`FailingLlm`]: deterministic doubles for tests

pub mod config;
pub mod error;
pub mod http;
pub mod provider;

pub use config::{LlmBackend, LlmConfig};
pub use error::LlmError;
pub use http::HttpLlm;
pub use provider::{FailingLlm, LlmProvider, ScriptedLlm};
