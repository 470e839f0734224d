//! Per-search options.
//!
//! [`TsearchOptions`] selects the vector, headlines and rank normalization of
//! one search; [`FindOptions`] carries the caller's own SELECT pieces that the
//! search is merged into.
//!
//! Defaults can be overridden through environment variables:
//! - `TSEARCH_VECTOR` (default: `vectors`)
//! - `TSEARCH_FIX_QUERY` (default: true)
//! - `TSEARCH_NORMALIZATION` (default: unset)

use std::env;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Options controlling how a search is built.
///
/// # Example
/// ```
/// use tsearch_core::options::TsearchOptions;
///
/// let options = TsearchOptions::default()
///     .vector("title_vector")
///     .headline("body")
///     .normalization(32);
/// assert_eq!(options.vector, "title_vector");
/// assert!(options.fix_query);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsearchOptions {
    /// Vector column to search.
    pub vector: String,
    /// Translate Google-like syntax into tsquery syntax before searching.
    /// When false the search text goes to `to_tsquery` untouched.
    pub fix_query: bool,
    /// Columns to return `ts_headline` snippets for, as `<column>_headline`.
    pub headlines: Vec<String>,
    /// `ts_rank_cd` normalization bitmask.
    pub normalization: Option<i32>,
}

impl Default for TsearchOptions {
    fn default() -> Self {
        Self {
            vector: defaults::VECTOR_NAME.to_string(),
            fix_query: true,
            headlines: Vec::new(),
            normalization: None,
        }
    }
}

impl TsearchOptions {
    /// Constructs options from environment variables.
    ///
    /// Boolean values "true", "1", "yes", "on" (case-insensitive) are truthy and
    /// "false", "0", "no", "off" falsy; anything else falls back to the default.
    /// An unparsable `TSEARCH_NORMALIZATION` is ignored.
    pub fn from_env() -> Self {
        Self {
            vector: env::var("TSEARCH_VECTOR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::VECTOR_NAME.to_string()),
            fix_query: parse_bool_env("TSEARCH_FIX_QUERY", true),
            headlines: Vec::new(),
            normalization: env::var("TSEARCH_NORMALIZATION")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn vector(mut self, vector: impl Into<String>) -> Self {
        self.vector = vector.into();
        self
    }

    pub fn fix_query(mut self, enabled: bool) -> Self {
        self.fix_query = enabled;
        self
    }

    pub fn headline(mut self, column: impl Into<String>) -> Self {
        self.headlines.push(column.into());
        self
    }

    pub fn normalization(mut self, flags: i32) -> Self {
        self.normalization = Some(flags);
        self
    }
}

/// Caller-supplied pieces of the SELECT a search is merged into.
///
/// Every field is raw SQL owned by the caller. The search text is bound as
/// `$1`, so caller conditions needing parameters start at `$2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    pub select: Option<String>,
    pub from: Option<String>,
    pub conditions: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn conditions(mut self, conditions: impl Into<String>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Parses a boolean environment variable with a default fallback.
fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|val| match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
