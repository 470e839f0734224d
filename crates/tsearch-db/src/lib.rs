//! # tsearch-db
//!
//! PostgreSQL layer for tsearch.
//!
//! This crate provides:
//! - Connection pool management
//! - Attach-time checks of a search configuration against the live table
//! - tsvector column maintenance (create, remove, refresh)
//! - Ranked full-text search and counting
//!
//! ## Example
//!
//! ```rust,ignore
//! use tsearch_db::{create_pool, FieldSpec, FindOptions, PgTsearch, TsearchConfig,
//!     TsearchOptions, TsearchRepository, VectorRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("postgres://localhost/blog").await?;
//!     let config = TsearchConfig::with_fields(
//!         "articles",
//!         FieldSpec::MultiColumn(vec!["title".into(), "body".into()]),
//!     );
//!     let articles = PgTsearch::attach(pool, config).await?;
//!
//!     articles.update_vectors(None).await?;
//!
//!     let hits = articles
//!         .search_hits("+rust -java", FindOptions::new().limit(10), &TsearchOptions::default())
//!         .await?;
//!     println!("{} hits", hits.len());
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod tsearch;

// Test fixtures for integration tests.
// Always compiled so integration tests (in tests/) can use them.
pub mod test_fixtures;

// Re-export core and query types
pub use tsearch_query::*;

pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use tsearch::PgTsearch;
