#![deny(unsafe_code)]
//! # geni-types
//!
//! Shared vocabulary for the Geni synthesis pipeline.
//!
//! ## Key Types
//!
//! - [`Shape`]: declared input/output shape, rendered as a TypeScript type
//! - [`Fingerprint`]: BLAKE3 digest identifying one generation task
//! - [`TaskSpec`] / [`TestCase`]: what the caller asks for
//! - [`Verdict`]: pass, or fail with a diagnostic
//! - [`FeedbackRecord`]: a failed attempt fed back into the next prompt

pub mod equality;
pub mod error;
pub mod fingerprint;
pub mod shape;
pub mod task;
pub mod verdict;

pub use equality::deep_equal;
pub use error::ShapeError;
pub use fingerprint::{Fingerprint, FingerprintError};
pub use shape::Shape;
pub use task::{TaskSpec, TestCase};
pub use verdict::{FeedbackRecord, ValidatedAttempt, Verdict};
