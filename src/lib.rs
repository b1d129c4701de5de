#![forbid(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::panic)]
#![warn(clippy::missing_const_for_fn, clippy::all)]

//! # Superstore demo
//!
//! A demonstration driver for a file-backed analytical database reached
//! through an embedded engine binding. The crate creates the five fixed
//! Superstore tables, bulk-inserts sample rows, and runs update and delete
//! passes against copies of the database file. It features:
//! - A `Session` pairing one engine handle with one open database file
//! - Scoped acquisition: the session is released on every exit path
//! - A buffered `Inserter` that validates rows against the table schema
//! - Identifier and string-literal escaping for hand-assembled statements
//!
//! The engine itself is an opaque third-party component; this crate holds
//! no storage, planning, or transaction machinery of its own.

pub mod api;
pub mod core;
pub mod demo;

// Re-export key types for easier use by library consumers
pub use api::inserter::Inserter;
pub use api::session::{CreateMode, Session};
pub use crate::core::common::types::{Nullability, Row, SqlType, Value};
pub use crate::core::common::EngineError;
pub use crate::core::schema::{escape_name, escape_string_literal, Column, TableSchema};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, EngineError>;
