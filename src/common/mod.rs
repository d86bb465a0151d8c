//! Common types and utilities shared across the crate.

pub mod error;
pub mod metadata;
pub mod xml;

pub use error::{Error, Result};
pub use metadata::Metadata;
