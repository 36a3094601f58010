#![deny(unsafe_code)]
//! # geni-storage
//!
//! The storage capability the synthesis pipeline persists through.
//!
//! Every path handed to a [`Storage`] is relative to the backend's root.
//! [`FsStorage`] maps it onto a directory with `tokio::fs`;
//! [`InMemoryStorage`] keeps everything in a map for test suites.

pub mod error;
pub mod fs;
pub mod memory;
pub mod storage;

pub use error::StorageError;
pub use fs::FsStorage;
pub use memory::InMemoryStorage;
pub use storage::{validate_relative, Storage};
