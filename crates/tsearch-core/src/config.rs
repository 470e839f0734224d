//! Search configuration: which columns feed which tsvector columns.
//!
//! A [`TsearchConfig`] is an explicit value handed to whatever needs it; there
//! is no process-wide registry. It can be built in code or deserialized from
//! YAML/JSON, where `fields` accepts any of the three [`FieldSpec`] shapes:
//!
//! ```yaml
//! table: blog_entries
//! vectors:
//!   vectors:
//!     fields:
//!       a: { columns: [title], weight: 1.0 }
//!       b: { columns: [blog_comments.comment], weight: 0.5 }
//!     tables:
//!       blog_comments:
//!         from: blog_entries b2 left outer join blog_comments on blog_comments.blog_entry_id = b2.id
//!         where: b2.id = blog_entries.id
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::identifier::{validate_identifier, validate_qualified_identifier};
use crate::{Error, Result};

/// Weight class of a tsvector lexeme, in `setweight` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeightLabel {
    #[serde(rename = "a", alias = "A")]
    A,
    #[serde(rename = "b", alias = "B")]
    B,
    #[serde(rename = "c", alias = "C")]
    C,
    #[serde(rename = "d", alias = "D")]
    D,
}

impl WeightLabel {
    /// All labels from highest to lowest weight.
    pub const ALL: [WeightLabel; 4] = [
        WeightLabel::A,
        WeightLabel::B,
        WeightLabel::C,
        WeightLabel::D,
    ];

    /// Upper-case label as PostgreSQL's `setweight` expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightLabel::A => "A",
            WeightLabel::B => "B",
            WeightLabel::C => "C",
            WeightLabel::D => "D",
        }
    }

    /// PostgreSQL's built-in weight for this label.
    pub fn default_weight(&self) -> f64 {
        match self {
            WeightLabel::A => defaults::WEIGHT_A,
            WeightLabel::B => defaults::WEIGHT_B,
            WeightLabel::C => defaults::WEIGHT_C,
            WeightLabel::D => defaults::WEIGHT_D,
        }
    }
}

fn default_weight() -> f64 {
    defaults::SHORTHAND_WEIGHT
}

/// Columns sharing one weight label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGroup {
    pub columns: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl WeightedGroup {
    pub fn new<I, S>(columns: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            weight,
        }
    }
}

/// Which columns feed a search vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    /// One column.
    SingleColumn(String),
    /// Several columns concatenated with spaces, unweighted.
    MultiColumn(Vec<String>),
    /// Up to four labelled groups, each with its own rank weight.
    WeightedGroups(BTreeMap<WeightLabel, WeightedGroup>),
}

impl FieldSpec {
    /// Every column referenced, in declaration (or label) order.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            FieldSpec::SingleColumn(column) => vec![column.as_str()],
            FieldSpec::MultiColumn(columns) => columns.iter().map(String::as_str).collect(),
            FieldSpec::WeightedGroups(groups) => groups
                .values()
                .flat_map(|g| g.columns.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Fold single/multi column specs into weight group A at weight 1.0.
    pub fn into_weighted(self) -> Self {
        let columns = match self {
            FieldSpec::SingleColumn(column) => vec![column],
            FieldSpec::MultiColumn(columns) => columns,
            weighted @ FieldSpec::WeightedGroups(_) => return weighted,
        };
        let mut groups = BTreeMap::new();
        groups.insert(
            WeightLabel::A,
            WeightedGroup::new(columns, defaults::SHORTHAND_WEIGHT),
        );
        FieldSpec::WeightedGroups(groups)
    }

    fn validate(&self, vector: &str) -> Result<()> {
        match self {
            FieldSpec::SingleColumn(_) => {}
            FieldSpec::MultiColumn(columns) => {
                if columns.is_empty() {
                    return Err(Error::Config(format!(
                        "vector [{}] has an empty column list",
                        vector
                    )));
                }
            }
            FieldSpec::WeightedGroups(groups) => {
                if groups.is_empty() {
                    return Err(Error::Config(format!(
                        "vector [{}] has no weighted groups",
                        vector
                    )));
                }
                for (label, group) in groups {
                    if group.columns.is_empty() {
                        return Err(Error::Config(format!(
                            "vector [{}] group {} has no columns",
                            vector,
                            label.as_str()
                        )));
                    }
                    if !(0.0..=1.0).contains(&group.weight) {
                        return Err(Error::Config(format!(
                            "vector [{}] group {} weight {} is outside [0, 1]",
                            vector,
                            label.as_str(),
                            group.weight
                        )));
                    }
                }
            }
        }

        for column in self.columns() {
            validate_qualified_identifier(column, "column").map_err(into_config)?;
        }
        Ok(())
    }
}

/// Extra relation joined in when a vector pulls columns from another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableJoin {
    /// FROM item, e.g. `blog_entries b2 left outer join blog_comments on ...`.
    pub from: String,
    /// Condition tying the FROM item back to the updated row.
    #[serde(rename = "where")]
    pub where_clause: String,
}

impl TableJoin {
    pub fn new(from: impl Into<String>, where_clause: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            where_clause: where_clause.into(),
        }
    }
}

/// Index access method for the vector column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMethod {
    #[default]
    Gist,
    Gin,
}

impl IndexMethod {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IndexMethod::Gist => "gist",
            IndexMethod::Gin => "gin",
        }
    }
}

fn default_auto_update_index() -> bool {
    defaults::AUTO_UPDATE_INDEX
}

/// Configuration of a single tsvector column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorConfig {
    pub fields: FieldSpec,
    /// Refresh the vector of a row after it is saved.
    #[serde(default = "default_auto_update_index")]
    pub auto_update_index: bool,
    #[serde(default)]
    pub tables: BTreeMap<String, TableJoin>,
    /// Text search configuration (regconfig) such as `english`.
    /// `None` uses the server's `default_text_search_config`.
    #[serde(default)]
    pub text_search_config: Option<String>,
    #[serde(default)]
    pub index_method: IndexMethod,
}

impl VectorConfig {
    pub fn new(fields: FieldSpec) -> Self {
        Self {
            fields,
            auto_update_index: defaults::AUTO_UPDATE_INDEX,
            tables: BTreeMap::new(),
            text_search_config: None,
            index_method: IndexMethod::default(),
        }
    }

    pub fn auto_update_index(mut self, enabled: bool) -> Self {
        self.auto_update_index = enabled;
        self
    }

    pub fn join(mut self, name: impl Into<String>, join: TableJoin) -> Self {
        self.tables.insert(name.into(), join);
        self
    }

    pub fn text_search_config(mut self, config: impl Into<String>) -> Self {
        self.text_search_config = Some(config.into());
        self
    }

    pub fn index_method(mut self, method: IndexMethod) -> Self {
        self.index_method = method;
        self
    }
}

/// Full-text search configuration of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsearchConfig {
    pub table: String,
    pub vectors: BTreeMap<String, VectorConfig>,
}

impl TsearchConfig {
    /// Configuration with no vectors yet; add them with [`TsearchConfig::vector`].
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            vectors: BTreeMap::new(),
        }
    }

    /// Shorthand: a single vector named `vectors` built from `fields`.
    ///
    /// Single and multi column specs become weight group A at weight 1.0.
    pub fn with_fields(table: impl Into<String>, fields: FieldSpec) -> Self {
        Self::new(table).vector(
            defaults::VECTOR_NAME,
            VectorConfig::new(fields.into_weighted()),
        )
    }

    pub fn vector(mut self, name: impl Into<String>, config: VectorConfig) -> Self {
        self.vectors.insert(name.into(), config);
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a vector by name.
    pub fn get(&self, vector: &str) -> Option<&VectorConfig> {
        self.vectors.get(vector)
    }

    /// Like [`TsearchConfig::get`] but a missing vector is a configuration error.
    pub fn require(&self, vector: &str) -> Result<&VectorConfig> {
        self.get(vector).ok_or_else(|| {
            Error::Config(format!(
                "Vector [{}] not found in tsearch config for table {} (configured: {})",
                vector,
                self.table,
                self.vector_names().join(", ")
            ))
        })
    }

    pub fn vector_names(&self) -> Vec<&str> {
        self.vectors.keys().map(String::as_str).collect()
    }

    /// Distinct columns referenced by all vectors, sorted.
    pub fn columns(&self) -> Vec<String> {
        self.vectors
            .values()
            .flat_map(|v| v.fields.columns())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check every name that will be spliced into SQL.
    pub fn validate(&self) -> Result<()> {
        validate_qualified_identifier(&self.table, "table").map_err(into_config)?;

        if self.vectors.is_empty() {
            return Err(Error::Config(format!(
                "Missing required fields for tsearch on table {}: at least one vector is needed",
                self.table
            )));
        }

        for (name, vector) in &self.vectors {
            validate_identifier(name, "vector").map_err(into_config)?;
            vector.fields.validate(name)?;
            if let Some(ts_config) = &vector.text_search_config {
                validate_qualified_identifier(ts_config, "text search configuration")
                    .map_err(into_config)?;
            }
            for (join_name, join) in &vector.tables {
                if join.from.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "vector [{}] join {} has an empty from clause",
                        name, join_name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn into_config(err: Error) -> Error {
    match err {
        Error::InvalidInput(msg) => Error::Config(msg),
        other => other,
    }
}
