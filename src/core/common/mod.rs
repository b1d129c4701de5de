//! Types shared across the crate: the `EngineError` taxonomy and the
//! value/type model rows are built from.

pub mod error;
pub mod types;

pub use error::EngineError;
