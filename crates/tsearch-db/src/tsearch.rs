//! Full-text search over one configured table.
//!
//! [`PgTsearch::attach`] binds a [`TsearchConfig`] to a pool after checking
//! that the table exists, the server has built-in text search, and every
//! configured column is present. The attached value then maintains the
//! tsvector columns and runs ranked searches against them.

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::{debug, error, info, warn};

use tsearch_core::defaults::{HEADLINE_SUFFIX, MIN_SERVER_VERSION_NUM, RANK_ALIAS, ROW_ID_COLUMN};
use tsearch_core::{
    is_qualified, validate_identifier, Error, FindOptions, Result, TsearchConfig, TsearchHit,
    TsearchOptions, TsearchRepository, VectorRepository,
};
use tsearch_query::{create_vector_sql, remove_vector_sql, update_vector_sql, TsearchQuery};

use crate::pool::log_pool_metrics;

/// Full-text search provider for one table.
pub struct PgTsearch {
    pool: PgPool,
    config: TsearchConfig,
}

impl PgTsearch {
    /// Validate `config` against the live database and attach it.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the configuration is malformed
    /// - `Error::NotFound` if the table cannot be read
    /// - `Error::UnsupportedVersion` before PostgreSQL 8.3
    /// - `Error::MissingColumns` if configured columns are absent
    pub async fn attach(pool: PgPool, config: TsearchConfig) -> Result<Self> {
        let start = Instant::now();
        config.validate()?;

        let tsearch = Self { pool, config };
        let table = tsearch.config.table.clone();

        let columns = match tsearch.column_names().await {
            Ok(columns) if !columns.is_empty() => columns,
            Ok(_) => {
                error!(
                    subsystem = "database",
                    component = "tsearch",
                    op = "attach",
                    table = %table,
                    "Table could not be accessed. Is the database configured?"
                );
                return Err(Error::NotFound(format!("Table {} could not be accessed", table)));
            }
            Err(e) => {
                error!(
                    subsystem = "database",
                    component = "tsearch",
                    op = "attach",
                    table = %table,
                    error = %e,
                    "Table could not be accessed. Is the database configured?"
                );
                return Err(Error::NotFound(format!(
                    "Table {} could not be accessed: {}",
                    table, e
                )));
            }
        };

        tsearch.ensure_database_supports_text_search().await?;
        tsearch.validate_option_fields(&columns)?;

        info!(
            subsystem = "database",
            component = "tsearch",
            op = "attach",
            table = %table,
            vectors = %tsearch.config.vector_names().join(","),
            duration_ms = start.elapsed().as_millis() as u64,
            "Attached tsearch configuration"
        );
        Ok(tsearch)
    }

    pub fn config(&self) -> &TsearchConfig {
        &self.config
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn table(&self) -> &str {
        &self.config.table
    }

    /// Column names of the attached table, in ordinal order.
    ///
    /// A `schema.table` name is looked up in that schema, a bare name in
    /// `current_schema()`.
    pub async fn column_names(&self) -> Result<Vec<String>> {
        let (schema, table) = match self.table().rsplit_once('.') {
            Some((schema, table)) => (Some(schema), table),
            None => (None, self.table()),
        };

        let columns: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_name = $1
              AND table_schema = COALESCE($2::text, current_schema()::text)
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .bind(schema)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(columns)
    }

    async fn has_column(&self, column: &str) -> Result<bool> {
        Ok(self.column_names().await?.iter().any(|c| c == column))
    }

    /// `server_version_num` of the connected server.
    pub async fn server_version_num(&self) -> Result<i32> {
        sqlx::query_scalar("SELECT current_setting('server_version_num')::int")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    /// Fail unless the server has built-in text search.
    pub async fn ensure_database_supports_text_search(&self) -> Result<()> {
        let version = self.server_version_num().await?;
        debug!(
            subsystem = "database",
            component = "tsearch",
            op = "version_check",
            server_version = version,
            "Checked server version"
        );
        if version < MIN_SERVER_VERSION_NUM {
            return Err(Error::UnsupportedVersion {
                found: version,
                required: MIN_SERVER_VERSION_NUM,
            });
        }
        Ok(())
    }

    /// Every unqualified configured column must be one of `columns`.
    ///
    /// Qualified names (`other_table.column`) belong to join tables and are
    /// not checked.
    pub fn validate_option_fields(&self, columns: &[String]) -> Result<()> {
        let missing: Vec<String> = self
            .config
            .columns()
            .into_iter()
            .filter(|f| !is_qualified(f) && !columns.contains(f))
            .collect();

        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                table: self.table().to_string(),
                columns: missing,
            });
        }
        Ok(())
    }

    /// Run DDL statements one by one; a failure is logged and skipped.
    ///
    /// Returns the number of statements that failed.
    async fn execute_ddl(&self, op: &'static str, vector: &str, statements: Vec<String>) -> usize {
        let mut failed = 0;
        for sql in statements {
            debug!(
                subsystem = "database",
                component = "vectors",
                op,
                table = %self.table(),
                vector,
                sql = %sql,
                "Executing vector DDL"
            );
            if let Err(e) = sqlx::query(&sql).execute(&self.pool).await {
                failed += 1;
                warn!(
                    subsystem = "database",
                    component = "vectors",
                    op,
                    table = %self.table(),
                    vector,
                    sql = %sql,
                    error = %e,
                    "Vector DDL statement failed, continuing"
                );
            }
        }
        failed
    }

    /// Create and populate the vector column if it does not exist yet.
    pub async fn check_for_vector_column(&self, vector: &str) -> Result<()> {
        if !self.has_column(vector).await? {
            info!(
                subsystem = "database",
                component = "vectors",
                op = "check_for_vector_column",
                table = %self.table(),
                vector,
                "Vector column missing, creating and populating"
            );
            self.create_vector(vector).await?;
            self.update_vector(None, vector).await?;
        }
        Ok(())
    }

    /// Build the search for `search` without running it.
    ///
    /// Ensures the vector is configured and its column exists (creating and
    /// populating it if needed).
    pub async fn find_by_tsearch_options(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<TsearchQuery> {
        let query = TsearchQuery::build(&self.config, search, find, options)?;
        self.check_for_vector_column(&options.vector).await?;
        Ok(query)
    }

    /// Like [`PgTsearch::find_by_tsearch_options`]; the returned query can be
    /// narrowed further (`conditions`, `limit`, `offset`) and then run with
    /// [`PgTsearch::fetch`].
    pub async fn scoped_by_tsearch(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<TsearchQuery> {
        self.find_by_tsearch_options(search, find, options).await
    }

    /// Run a built query, returning raw rows.
    pub async fn fetch(&self, query: &TsearchQuery) -> Result<Vec<PgRow>> {
        let start = Instant::now();
        let sql = query.to_sql();

        let rows = sqlx::query(&sql)
            .bind(query.query_text())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tsearch",
            op = "find",
            table = %self.table(),
            query = %query.query_text(),
            result_count = rows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Full-text search complete"
        );
        log_pool_metrics(&self.pool);
        Ok(rows)
    }

    /// Search, returning raw rows.
    pub async fn find_by_tsearch(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<Vec<PgRow>> {
        let query = self.find_by_tsearch_options(search, find, options).await?;
        self.fetch(&query).await
    }

    /// Search, decoding each row as `T`.
    pub async fn find_by_tsearch_as<T>(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let query = self.find_by_tsearch_options(search, find, options).await?;
        let sql = query.to_sql();

        sqlx::query_as::<_, T>(&sql)
            .bind(query.query_text())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}

fn hit_from_row(row: &PgRow, headlines: &[String]) -> Result<TsearchHit> {
    let mut hit = TsearchHit {
        id: row.try_get(ROW_ID_COLUMN).map_err(Error::Database)?,
        rank: row
            .try_get::<Option<f32>, _>(RANK_ALIAS)
            .map_err(Error::Database)?
            .unwrap_or(0.0),
        headlines: BTreeMap::new(),
    };
    for column in headlines {
        let alias = format!("{}{}", column, HEADLINE_SUFFIX);
        if let Some(headline) = row
            .try_get::<Option<String>, _>(alias.as_str())
            .map_err(Error::Database)?
        {
            hit.headlines.insert(column.clone(), headline);
        }
    }
    Ok(hit)
}

#[async_trait]
impl VectorRepository for PgTsearch {
    async fn create_vector(&self, vector: &str) -> Result<()> {
        validate_identifier(vector, "vector")?;
        let method = self
            .config
            .get(vector)
            .map(|v| v.index_method)
            .unwrap_or_default();
        let exists = self.has_column(vector).await?;

        let failed = self
            .execute_ddl(
                "create_vector",
                vector,
                create_vector_sql(self.table(), vector, method, exists),
            )
            .await;

        if failed == 0 {
            info!(
                subsystem = "database",
                component = "vectors",
                op = "create_vector",
                table = %self.table(),
                vector,
                replaced = exists,
                "Vector column created"
            );
        } else {
            warn!(
                subsystem = "database",
                component = "vectors",
                op = "create_vector",
                table = %self.table(),
                vector,
                replaced = exists,
                failed_statements = failed,
                "Vector column creation incomplete"
            );
        }
        Ok(())
    }

    async fn remove_vector(&self, vector: &str) -> Result<()> {
        validate_identifier(vector, "vector")?;
        let exists = self.has_column(vector).await?;

        let failed = self
            .execute_ddl(
                "remove_vector",
                vector,
                remove_vector_sql(self.table(), vector, exists),
            )
            .await;

        if failed == 0 {
            info!(
                subsystem = "database",
                component = "vectors",
                op = "remove_vector",
                table = %self.table(),
                vector,
                existed = exists,
                "Vector column removed"
            );
        } else {
            warn!(
                subsystem = "database",
                component = "vectors",
                op = "remove_vector",
                table = %self.table(),
                vector,
                failed_statements = failed,
                "Vector column removal failed"
            );
        }
        Ok(())
    }

    async fn update_vector(&self, row_id: Option<i64>, vector: &str) -> Result<u64> {
        let start = Instant::now();
        let statement = update_vector_sql(&self.config, vector, row_id)?;

        if !self.has_column(vector).await? {
            self.create_vector(vector).await?;
        }

        let mut query = sqlx::query(&statement.sql);
        if let Some(id) = statement.row_id {
            query = query.bind(id);
        }
        let rows_affected = query
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .rows_affected();

        debug!(
            subsystem = "database",
            component = "vectors",
            op = "update_vector",
            table = %self.table(),
            vector,
            row_id = ?row_id,
            rows_affected,
            duration_ms = start.elapsed().as_millis() as u64,
            "Vector refreshed"
        );
        Ok(rows_affected)
    }

    async fn update_vectors(&self, row_id: Option<i64>) -> Result<()> {
        for vector in self.config.vector_names() {
            self.update_vector(row_id, vector).await?;
        }
        Ok(())
    }

    async fn update_vector_row(&self, row_id: i64) -> Result<()> {
        for (name, vector) in &self.config.vectors {
            if vector.auto_update_index {
                self.update_vector(Some(row_id), name).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TsearchRepository for PgTsearch {
    /// Ids, ranks and headlines of matching rows; `find.select` is replaced.
    async fn search_hits(
        &self,
        search: &str,
        mut find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<Vec<TsearchHit>> {
        find.select = Some(format!(
            "{}.{}::bigint as {}",
            self.table(),
            ROW_ID_COLUMN,
            ROW_ID_COLUMN
        ));
        let query = self.find_by_tsearch_options(search, find, options).await?;
        let rows = self.fetch(&query).await?;

        rows.iter()
            .map(|row| hit_from_row(row, &options.headlines))
            .collect()
    }

    async fn count_by_tsearch(
        &self,
        search: &str,
        find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<i64> {
        let start = Instant::now();
        let query = self
            .find_by_tsearch_options(search, find, options)
            .await?
            .into_count();
        let sql = query.to_sql();

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(query.query_text())
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tsearch",
            op = "count",
            table = %self.table(),
            query = %query.query_text(),
            result_count = count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Full-text count complete"
        );
        Ok(count)
    }
}
