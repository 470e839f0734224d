//! # tsearch-query
//!
//! Query translation and SQL generation for PostgreSQL full-text search.
//!
//! This crate provides:
//! - Google-like query to `to_tsquery` translation ([`normalizer`])
//! - Ranked search SQL: rank, headline, and query fragments ([`search`])
//! - tsvector column DDL and refresh statements ([`vectors`])
//!
//! Nothing here touches a database; `tsearch-db` executes what is built.
//!
//! ## Example
//!
//! ```
//! use tsearch_query::{FieldSpec, FindOptions, TsearchConfig, TsearchOptions, TsearchQuery};
//!
//! let config = TsearchConfig::with_fields(
//!     "articles",
//!     FieldSpec::MultiColumn(vec!["title".into(), "body".into()]),
//! );
//!
//! let query = TsearchQuery::build(
//!     &config,
//!     "+rust -java \"error handling\"",
//!     FindOptions::new().limit(20),
//!     &TsearchOptions::default().headline("body"),
//! )?;
//!
//! assert_eq!(query.query_text(), "rust&!java&(error&handling)");
//! assert!(query.to_sql().contains("articles.vectors @@ tsearch_query"));
//! # Ok::<(), tsearch_query::Error>(())
//! ```

pub mod normalizer;
pub mod search;
pub mod vectors;

// Re-export core types
pub use tsearch_core::*;

pub use normalizer::{
    clean_query, fix_tsearch_query, join_terms, normalize_query, query_to_terms,
    tsquery_parameter, Connector, Term,
};
pub use search::{
    merge_conditions, rank_function, tsearch_rank_select_sql, weights_sql, TsearchQuery,
};
pub use vectors::{
    coalesce_columns, create_vector_sql, index_name, remove_vector_sql, update_vector_sql,
    vector_expression, UpdateStatement,
};
