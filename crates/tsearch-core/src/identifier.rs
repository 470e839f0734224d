//! SQL identifier validation.
//!
//! Table, column, vector and text search configuration names are spliced
//! into generated SQL, so every one of them passes through here first.

use crate::defaults::MAX_IDENTIFIER_LEN;
use crate::{Error, Result};

const RESERVED_KEYWORDS: &[&str] = &[
    "pg_catalog",
    "information_schema",
    "pg_toast",
    "select",
    "insert",
    "update",
    "delete",
    "drop",
    "create",
    "alter",
    "grant",
    "revoke",
    "truncate",
];

/// Validate a bare PostgreSQL identifier.
///
/// Identifiers must:
/// - Not be empty
/// - Not exceed 63 characters (PostgreSQL identifier limit)
/// - Contain only ASCII alphanumeric characters and underscores
/// - Not start with a digit
/// - Not be a dangerous SQL keyword
///
/// `kind` names the identifier in error messages ("column", "table", ...).
///
/// # Examples
///
/// ```
/// use tsearch_core::identifier::validate_identifier;
///
/// assert!(validate_identifier("title", "column").is_ok());
/// assert!(validate_identifier("9lives", "column").is_err());
/// assert!(validate_identifier("", "column").is_err());
/// ```
pub fn validate_identifier(name: &str, kind: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} name cannot be empty", kind)));
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::InvalidInput(format!(
            "{} name exceeds {} character limit: {} characters",
            kind,
            MAX_IDENTIFIER_LEN,
            name.len()
        )));
    }

    if let Some(first) = name.chars().next() {
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(Error::InvalidInput(format!(
                "{} name must start with a letter or underscore, found: '{}'",
                kind, first
            )));
        }
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(Error::InvalidInput(format!(
                "{} name '{}' contains invalid character: '{}'. Only alphanumeric and underscore allowed",
                kind, name, ch
            )));
        }
    }

    if RESERVED_KEYWORDS.contains(&name.to_lowercase().as_str()) {
        return Err(Error::InvalidInput(format!(
            "{} name '{}' is a reserved SQL keyword",
            kind, name
        )));
    }

    Ok(())
}

/// Validate an identifier that may be qualified with dots.
///
/// Accepts `column`, `table.column` and `schema.table.column`; each
/// segment must satisfy [`validate_identifier`].
///
/// ```
/// use tsearch_core::identifier::validate_qualified_identifier;
///
/// assert!(validate_qualified_identifier("blog_comments.comment", "column").is_ok());
/// assert!(validate_qualified_identifier("a..b", "column").is_err());
/// ```
pub fn validate_qualified_identifier(name: &str, kind: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} name cannot be empty", kind)));
    }

    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > 3 {
        return Err(Error::InvalidInput(format!(
            "{} name '{}' has too many qualifiers",
            kind, name
        )));
    }

    for segment in segments {
        validate_identifier(segment, kind)?;
    }

    Ok(())
}

/// Returns true if the name refers to a column of another relation.
///
/// Qualified columns are not checked against the attached table's columns.
#[inline]
pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}
