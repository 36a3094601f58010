#![deny(unsafe_code)]
//! # geni-kernel
//!
//! The synthesis pipeline: find a cached function that still passes, or
//! generate, validate and retry until one does.
//!
//! ## Key Types
//!
//! - [`Geni`]: the orchestrator, `synthesize(&TaskSpec) -> Runnable`
//! - [`Validator`]: type check, then run the task's tests in the sandbox
//! - [`AttemptStore`]: per-fingerprint attempt files and the final artifact
//! - [`Runnable`]: a validated function bound to its shapes
//! - [`GeniConfig`]: retry budget, timeouts, backends

pub mod attempt_store;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod runnable;
pub mod validator;

pub use attempt_store::AttemptStore;
pub use config::GeniConfig;
pub use error::{GeniError, RunError};
pub use orchestrator::Geni;
pub use runnable::Runnable;
pub use validator::{Validator, OUTDATED_PREFIX};
