//! # tandem-core
//!
//! Core types, traits, and abstractions for the tandem date-suggestion
//! pipeline.
//!
//! This crate provides the domain enumerations, the profile and suggestion
//! records, the shared error type, and the generation backend trait that the
//! other tandem crates depend on.

pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
