//! # tsearch-core
//!
//! Core types, configuration, and traits for tsearch, a PostgreSQL
//! full-text search layer.
//!
//! This crate provides the search configuration model, per-search options,
//! the shared error type, and the repository traits that `tsearch-db`
//! implements.

pub mod config;
pub mod defaults;
pub mod error;
pub mod identifier;
pub mod logging;
pub mod models;
pub mod options;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{
    FieldSpec, IndexMethod, TableJoin, TsearchConfig, VectorConfig, WeightLabel, WeightedGroup,
};
pub use error::{Error, Result};
pub use identifier::{is_qualified, validate_identifier, validate_qualified_identifier};
pub use models::TsearchHit;
pub use options::{FindOptions, TsearchOptions};
pub use traits::*;
