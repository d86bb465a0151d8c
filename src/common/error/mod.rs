//! Crate-wide error type.
//!
//! Callers that do not care which layer failed can convert any module error
//! into [`Error`] with `?`.

pub mod conversions;
pub mod types;

pub use types::{Error, Result};
