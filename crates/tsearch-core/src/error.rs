//! Error types for tsearch.

use thiserror::Error;

/// Result type alias using tsearch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tsearch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Search configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Server predates built-in text search
    #[error("Unsupported PostgreSQL version {found}: text search requires {required} or later")]
    UnsupportedVersion { found: i32, required: i32 },

    /// Configured columns are absent from the table
    #[error("Missing fields: {} in tsearch definition for table {table}", columns.join(","))]
    MissingColumns { table: String, columns: Vec<String> },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
