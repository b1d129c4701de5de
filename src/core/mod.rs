//! Shared plumbing beneath the public API: the error taxonomy, the value and
//! type model, and table schema handling.

pub mod common;
pub mod schema;
