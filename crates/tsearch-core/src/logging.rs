//! Structured logging field name constants for tsearch.
//!
//! All crates use these constants (or the identical literal names inside
//! `tracing` macros) so log aggregation can query the same fields across
//! the query builder and the database layer.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Table unusable, requires operator attention |
//! | WARN  | Recoverable issue, statement skipped and work continued |
//! | INFO  | Lifecycle events (pool, attach, vector column DDL) |
//! | DEBUG | Built SQL, normalized queries, config choices |
//! | TRACE | Per-statement iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "query", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "normalizer", "tsearch", "vectors", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "attach", "create_vector", "update_vector", "find", "count"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Table the search configuration is attached to.
pub const TABLE: &str = "table";

/// Search vector (tsvector column) name.
pub const VECTOR: &str = "vector";

/// Row id whose vector is being refreshed.
pub const ROW_ID: &str = "row_id";

/// Search query text (raw or normalized).
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of rows touched by an update.
pub const ROWS_AFFECTED: &str = "rows_affected";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// PostgreSQL `server_version_num`.
pub const SERVER_VERSION: &str = "server_version";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
