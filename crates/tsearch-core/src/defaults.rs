//! Centralized default constants for tsearch.
//!
//! Every crate references these instead of repeating literals that end up
//! inside generated SQL.

// =============================================================================
// VECTORS
// =============================================================================

/// Name of the tsvector column used when none is configured.
pub const VECTOR_NAME: &str = "vectors";

/// Weight assigned to the shorthand group.
pub const SHORTHAND_WEIGHT: f64 = 1.0;

/// Whether vectors are refreshed after each row write.
pub const AUTO_UPDATE_INDEX: bool = true;

// =============================================================================
// RANKING
// =============================================================================

/// PostgreSQL default weight for label D.
pub const WEIGHT_D: f64 = 0.1;

/// PostgreSQL default weight for label C.
pub const WEIGHT_C: f64 = 0.2;

/// PostgreSQL default weight for label B.
pub const WEIGHT_B: f64 = 0.4;

/// PostgreSQL default weight for label A.
pub const WEIGHT_A: f64 = 1.0;

/// Column alias carrying the rank in search results.
pub const RANK_ALIAS: &str = "tsearch_rank";

/// Alias of the `to_tsquery` relation joined into search queries.
pub const QUERY_ALIAS: &str = "tsearch_query";

/// Suffix appended to a column name for its `ts_headline` alias.
pub const HEADLINE_SUFFIX: &str = "_headline";

// =============================================================================
// DATABASE
// =============================================================================

/// Minimum `server_version_num` with built-in text search (8.3).
pub const MIN_SERVER_VERSION_NUM: i32 = 80300;

/// PostgreSQL identifier length limit.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Primary key column used to target single-row vector refreshes.
pub const ROW_ID_COLUMN: &str = "id";
