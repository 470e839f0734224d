//! Result types returned by searches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One matching row: its id, rank, and any requested headlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsearchHit {
    pub id: i64,
    /// `ts_rank_cd` score (`tsearch_rank` column).
    pub rank: f32,
    /// Headline snippets keyed by source column name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headlines: BTreeMap<String, String>,
}

impl TsearchHit {
    pub fn headline(&self, column: &str) -> Option<&str> {
        self.headlines.get(column).map(String::as_str)
    }
}
