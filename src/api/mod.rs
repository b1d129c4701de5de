//! Public API module for the demonstration driver
//!
//! This module provides the public-facing client surface: `Session` pairs one
//! engine handle with one open database file, and `Inserter` buffers typed
//! row batches for bulk submission.

pub mod inserter;
pub mod session;

pub use inserter::Inserter;
pub use session::{CreateMode, Session};
