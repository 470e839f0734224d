//! DDL and UPDATE statements that maintain tsvector columns.

use tsearch_core::defaults::ROW_ID_COLUMN;
use tsearch_core::{
    validate_identifier, FieldSpec, IndexMethod, Result, TsearchConfig, VectorConfig,
};

use crate::search::regconfig_arg;

/// Name of the index backing a vector column.
pub fn index_name(table: &str, vector: &str) -> String {
    format!("{}_fts_{}_index", table.replace('.', "_"), vector)
}

/// Statements that (re)create a vector column and its index.
///
/// An existing column is dropped first so the column starts empty.
pub fn create_vector_sql(
    table: &str,
    vector: &str,
    method: IndexMethod,
    column_exists: bool,
) -> Vec<String> {
    let mut sql = Vec::with_capacity(3);
    if column_exists {
        sql.push(format!("alter table {} drop column {}", table, vector));
    }
    sql.push(format!("alter table {} add column {} tsvector", table, vector));
    sql.push(format!(
        "CREATE INDEX {} ON {} USING {}({})",
        index_name(table, vector),
        table,
        method.as_sql(),
        vector
    ));
    sql
}

/// Statements that drop a vector column; nothing when it is absent.
pub fn remove_vector_sql(table: &str, vector: &str, column_exists: bool) -> Vec<String> {
    if column_exists {
        vec![format!("ALTER TABLE {} DROP COLUMN {}", table, vector)]
    } else {
        Vec::new()
    }
}

/// `coalesce(a,'') || ' ' || coalesce(b,'')`
pub fn coalesce_columns<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| format!("coalesce({},'')", c.as_ref()))
        .collect::<Vec<_>>()
        .join(" || ' ' || ")
}

/// Expression computing the tsvector value for a row.
pub fn vector_expression(vector: &VectorConfig) -> String {
    let regconfig = regconfig_arg(vector);
    match &vector.fields {
        FieldSpec::SingleColumn(column) => {
            format!("to_tsvector({}{})", regconfig, coalesce_columns(&[column]))
        }
        FieldSpec::MultiColumn(columns) => {
            format!("to_tsvector({}{})", regconfig, coalesce_columns(columns))
        }
        FieldSpec::WeightedGroups(groups) => groups
            .iter()
            .map(|(label, group)| {
                format!(
                    "setweight(to_tsvector({}{}),'{}')",
                    regconfig,
                    coalesce_columns(&group.columns),
                    label.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(" || "),
    }
}

/// An UPDATE refreshing one vector, with its optional `$1` row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub sql: String,
    pub row_id: Option<i64>,
}

/// Build the UPDATE refreshing `vector` for every row, or just `row_id`.
///
/// Join tables contribute a FROM list and their WHERE conditions.
pub fn update_vector_sql(
    config: &TsearchConfig,
    vector_name: &str,
    row_id: Option<i64>,
) -> Result<UpdateStatement> {
    validate_identifier(vector_name, "vector")?;
    let vector = config.require(vector_name)?;
    let table = config.table.as_str();

    let mut sql = format!(
        "update {} set {} = {}",
        table,
        vector_name,
        vector_expression(vector)
    );

    let mut where_parts: Vec<String> = Vec::new();
    if !vector.tables.is_empty() {
        let froms: Vec<&str> = vector.tables.values().map(|j| j.from.as_str()).collect();
        sql.push_str(" from ");
        sql.push_str(&froms.join(", "));
        where_parts.extend(
            vector
                .tables
                .values()
                .map(|j| j.where_clause.trim())
                .filter(|w| !w.is_empty())
                .map(str::to_string),
        );
    }

    if row_id.is_some() {
        where_parts.push(format!("{}.{} = $1", table, ROW_ID_COLUMN));
    }

    if !where_parts.is_empty() {
        sql.push_str(" where ");
        sql.push_str(&where_parts.join(" and "));
    }

    Ok(UpdateStatement { sql, row_id })
}
