#![deny(unsafe_code)]
//! # geni-synthesis
//!
//! Turns a task description into candidate TypeScript source.
//!
//! [`PromptBuilder`] renders the first request and, after failures, a
//! retry request carrying every earlier attempt with its diagnostic.
//! [`CodeGenerator`] sends it to an [`geni_llm::LlmProvider`] and appends
//! the typed `wrapper` adapter the validator checks against.

pub mod error;
pub mod generator;
pub mod prompt_builder;

pub use error::GenerationError;
pub use generator::{adapter, strip_code_fences, CodeGenerator};
pub use prompt_builder::PromptBuilder;
