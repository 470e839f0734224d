//! Repository traits implemented by the database layer.

use async_trait::async_trait;

use crate::{FindOptions, Result, TsearchHit, TsearchOptions};

/// Maintenance of tsvector columns.
#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// (Re)create the vector column and its index, dropping any existing column.
    async fn create_vector(&self, vector: &str) -> Result<()>;

    /// Drop the vector column if it exists.
    async fn remove_vector(&self, vector: &str) -> Result<()>;

    /// Recompute one vector for every row, or only `row_id`.
    /// Returns the number of rows updated.
    async fn update_vector(&self, row_id: Option<i64>, vector: &str) -> Result<u64>;

    /// Recompute every configured vector.
    async fn update_vectors(&self, row_id: Option<i64>) -> Result<()>;

    /// Hook to call after a row is written; refreshes vectors that auto-update.
    async fn update_vector_row(&self, row_id: i64) -> Result<()>;
}

/// Ranked full-text search over a configured table.
#[async_trait]
pub trait TsearchRepository: Send + Sync {
    /// Matching rows ordered by rank (unless `find.order` says otherwise).
    async fn search_hits(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<Vec<TsearchHit>>;

    /// Number of matching rows.
    async fn count_by_tsearch(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<i64>;
}
