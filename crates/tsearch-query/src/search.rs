//! SQL for ranked full-text search.
//!
//! [`TsearchQuery::build`] merges a search into the caller's [`FindOptions`]:
//!
//! ```sql
//! SELECT articles.*, ts_rank_cd(articles.vectors, tsearch_query) as tsearch_rank
//! FROM to_tsquery($1) as tsearch_query, articles
//! WHERE articles.vectors @@ tsearch_query
//! ORDER BY tsearch_rank desc
//! ```
//!
//! The search text is always bound as `$1`; only validated identifiers from
//! the configuration are interpolated.

use tracing::debug;

use tsearch_core::defaults::{HEADLINE_SUFFIX, QUERY_ALIAS, RANK_ALIAS};
use tsearch_core::{
    validate_identifier, Error, FieldSpec, FindOptions, Result, TsearchConfig, TsearchOptions,
    VectorConfig, WeightLabel,
};

use crate::normalizer::tsquery_parameter;

/// `'<regconfig>', ` when the vector names a text search configuration.
pub(crate) fn regconfig_arg(vector: &VectorConfig) -> String {
    vector
        .text_search_config
        .as_deref()
        .map(|cfg| format!("'{}', ", cfg))
        .unwrap_or_default()
}

/// Rank weights argument for `ts_rank_cd`.
///
/// Only weighted-group vectors carry weights; labels without a group keep
/// PostgreSQL's defaults. Returns `'{ D, C, B, A }', ` or an empty string.
///
/// ```
/// use std::collections::BTreeMap;
/// use tsearch_core::{FieldSpec, VectorConfig, WeightLabel, WeightedGroup};
/// use tsearch_query::search::weights_sql;
///
/// let mut groups = BTreeMap::new();
/// groups.insert(WeightLabel::A, WeightedGroup::new(["title"], 1.0));
/// groups.insert(WeightLabel::B, WeightedGroup::new(["body"], 0.5));
/// let vector = VectorConfig::new(FieldSpec::WeightedGroups(groups));
///
/// assert_eq!(weights_sql(&vector), "'{ 0.1, 0.2, 0.5, 1.0 }', ");
/// ```
pub fn weights_sql(vector: &VectorConfig) -> String {
    let FieldSpec::WeightedGroups(groups) = &vector.fields else {
        return String::new();
    };

    let weights: Vec<String> = WeightLabel::ALL
        .iter()
        .rev()
        .map(|label| {
            let weight = groups
                .get(label)
                .map(|g| g.weight)
                .unwrap_or_else(|| label.default_weight());
            format!("{:?}", weight)
        })
        .collect();

    format!("'{{ {} }}', ", weights.join(", "))
}

/// `ts_rank_cd(...)` expression for the searched vector.
pub fn rank_function(
    table: &str,
    vector_name: &str,
    vector: &VectorConfig,
    options: &TsearchOptions,
) -> String {
    let normalization = options
        .normalization
        .map(|n| format!(", {}", n))
        .unwrap_or_default();

    format!(
        "ts_rank_cd({}{}.{}, {}{})",
        weights_sql(vector),
        table,
        vector_name,
        QUERY_ALIAS,
        normalization
    )
}

/// `<rank function> as tsearch_rank`, for callers composing their own SELECT.
pub fn tsearch_rank_select_sql(config: &TsearchConfig, options: &TsearchOptions) -> Result<String> {
    validate_identifier(&options.vector, "vector")?;
    let vector = config.require(&options.vector)?;
    Ok(format!(
        "{} as {}",
        rank_function(&config.table, &options.vector, vector, options),
        RANK_ALIAS
    ))
}

/// AND a new condition onto existing caller conditions.
pub fn merge_conditions(existing: Option<&str>, condition: &str) -> String {
    match existing.map(str::trim).filter(|c| !c.is_empty()) {
        Some(existing) => format!("({}) AND ({})", existing, condition),
        None => condition.to_string(),
    }
}

fn is_count_select(select: &str) -> bool {
    select.trim().eq_ignore_ascii_case("count(*)")
}

/// A search merged into a SELECT, plus the text bound as `$1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsearchQuery {
    pub find: FindOptions,
    query_text: String,
}

impl TsearchQuery {
    /// Merge a search for `search` into `find`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if `search` is blank
    /// - `Error::Config` if `options.vector` is not configured
    /// - `Error::InvalidInput` for bad headline/vector names, or if nothing
    ///   searchable is left after normalization
    pub fn build(
        config: &TsearchConfig,
        search: &str,
        mut find: FindOptions,
        options: &TsearchOptions,
    ) -> Result<Self> {
        let table = config.table.as_str();

        if search.trim().is_empty() {
            return Err(Error::NotFound(format!(
                "Couldn't find {} without a search string",
                table
            )));
        }

        validate_identifier(&options.vector, "vector")?;
        let vector = config.require(&options.vector)?;
        for headline in &options.headlines {
            validate_identifier(headline, "headline column")?;
        }

        let query_text = tsquery_parameter(search, options);
        if query_text.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "search string {:?} has no searchable terms",
                search
            )));
        }

        let rank_select = format!(
            "{} as {}",
            rank_function(table, &options.vector, vector, options),
            RANK_ALIAS
        );
        let regconfig = regconfig_arg(vector);

        let mut select = match find.select.take() {
            None => format!("{}.*, {}", table, rank_select),
            Some(select) if is_count_select(&select) => select,
            Some(select) => format!("{}, {}", select, rank_select),
        };

        if find.order.is_none() && !is_count_select(&select) {
            find.order = Some(format!("{} desc", RANK_ALIAS));
        }

        if !is_count_select(&select) {
            for headline in &options.headlines {
                select.push_str(&format!(
                    ", ts_headline({}{}.{}, {}) as {}{}",
                    regconfig, table, headline, QUERY_ALIAS, headline, HEADLINE_SUFFIX
                ));
            }
        }
        find.select = Some(select);

        let query_from = format!("to_tsquery({}$1) as {}", regconfig, QUERY_ALIAS);
        find.from = Some(match find.from.take() {
            Some(from) => format!("{}, {}", query_from, from),
            None => format!("{}, {}", query_from, table),
        });

        let matches = format!("{}.{} @@ {}", table, options.vector, QUERY_ALIAS);
        find.conditions = Some(merge_conditions(find.conditions.as_deref(), &matches));

        debug!(
            subsystem = "query",
            component = "tsearch",
            op = "build",
            table,
            vector = %options.vector,
            query = %query_text,
            "Built tsearch query"
        );

        Ok(Self { find, query_text })
    }

    /// Text to bind as `$1`.
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Same search, selecting `count(*)` with no paging.
    pub fn into_count(mut self) -> Self {
        self.find.select = Some("count(*)".to_string());
        self.find.order = Some("1 desc".to_string());
        self.find.limit = None;
        self.find.offset = None;
        self
    }

    pub fn conditions(mut self, condition: &str) -> Self {
        self.find.conditions = Some(merge_conditions(self.find.conditions.as_deref(), condition));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.find.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.find.offset = Some(offset);
        self
    }

    /// Render the full SELECT statement.
    pub fn to_sql(&self) -> String {
        let find = &self.find;
        let mut sql = format!(
            "SELECT {} FROM {}",
            find.select.as_deref().unwrap_or("*"),
            find.from.as_deref().unwrap_or_default()
        );
        if let Some(conditions) = &find.conditions {
            sql.push_str(&format!(" WHERE {}", conditions));
        }
        if let Some(order) = &find.order {
            sql.push_str(&format!(" ORDER BY {}", order));
        }
        if let Some(limit) = find.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = find.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        sql
    }
}
