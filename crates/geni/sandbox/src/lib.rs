#![deny(unsafe_code)]
//! # geni-sandbox
//!
//! Runs and type-checks generated TypeScript outside the caller's process.
//!
//! ## Key Types
//!
//! - [`SandboxRunner`]: executes one candidate call under a wall-clock limit
//! - [`ProcessSandbox`]: one `deno run` child per call, every permission denied
//! - [`TypeChecker`]: static validation of a single source file
//! - [`CommandTypeChecker`]: `tsc --noEmit` with diagnostics parsed from its output
//! - [`SimulatedSandbox`], [`AcceptAllChecker`], [`RejectingChecker`]: in-process doubles

pub mod config;
pub mod error;
pub mod harness;
pub mod runner;
pub mod typecheck;

pub use config::{SandboxConfig, TypeCheckerConfig};
pub use error::{SandboxError, TypeCheckError};
pub use runner::{ProcessSandbox, SandboxRunner, SimulatedSandbox};
pub use typecheck::{
    AcceptAllChecker, CommandTypeChecker, Diagnostic, RejectingChecker, TypeChecker,
};
