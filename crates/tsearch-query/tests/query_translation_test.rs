//! Query translation test suite.
//!
//! Exercises the public API end to end:
//! - Google-like queries translated into tsquery syntax
//! - Search SQL built from YAML configuration
//! - Vector refresh statements for the same configuration

use tsearch_query::{
    normalize_query, update_vector_sql, Error, FindOptions, TsearchConfig, TsearchOptions,
    TsearchQuery,
};

const BLOG_CONFIG: &str = r#"
table: blog_entries
vectors:
  vectors:
    fields:
      a: { columns: [blog_entries.title], weight: 1.0 }
      b: { columns: [blog_comments.comment], weight: 0.5 }
    tables:
      blog_comments:
        from: blog_entries b2 left outer join blog_comments on blog_comments.blog_entry_id = b2.id
        where: b2.id = blog_entries.id
  title_vector:
    fields: title
    auto_update_index: false
    text_search_config: english
"#;

fn blog_config() -> TsearchConfig {
    TsearchConfig::from_yaml(BLOG_CONFIG).expect("blog config parses")
}

// ========== TRANSLATION ==========

#[test]
fn test_translate_typical_queries() {
    let cases = [
        ("rust", "rust"),
        ("rust async", "rust&async"),
        ("rust or go", "rust|go"),
        ("rust and -go", "rust&!go"),
        ("+rust -go", "rust&!go"),
        ("\"borrow checker\"", "(borrow&checker)"),
        ("\"borrow checker\" or lifetimes", "(borrow&checker)|lifetimes"),
        ("RUST, Tokio; Axum!", "rust&tokio&axum"),
        ("", ""),
    ];

    for (input, expected) in cases {
        assert_eq!(normalize_query(input), expected, "input: {:?}", input);
    }
}

#[test]
fn test_translation_never_leaks_quotes_unescaped() {
    let out = normalize_query("o'reilly \"it's\"");
    // Single quotes come out doubled, so the text is also safe as a SQL literal.
    assert_eq!(out, "o&reilly&(it''s)");

    // The bound value is what that literal denotes.
    let query = TsearchQuery::build(
        &blog_config(),
        "o'reilly \"it's\"",
        FindOptions::new(),
        &TsearchOptions::default(),
    )
    .expect("query builds");
    assert_eq!(query.query_text(), "o&reilly&(it's)");
}

// ========== SEARCH SQL ==========

#[test]
fn test_search_sql_uses_weights_from_config() {
    let query = TsearchQuery::build(
        &blog_config(),
        "ownership or borrowing",
        FindOptions::new().limit(25),
        &TsearchOptions::default(),
    )
    .expect("query builds");

    assert_eq!(query.query_text(), "ownership|borrowing");
    assert_eq!(
        query.to_sql(),
        "SELECT blog_entries.*, \
         ts_rank_cd('{ 0.1, 0.2, 0.5, 1.0 }', blog_entries.vectors, tsearch_query) as tsearch_rank \
         FROM to_tsquery($1) as tsearch_query, blog_entries \
         WHERE blog_entries.vectors @@ tsearch_query \
         ORDER BY tsearch_rank desc LIMIT 25"
    );
}

#[test]
fn test_search_sql_on_secondary_vector() {
    let options = TsearchOptions::default()
        .vector("title_vector")
        .headline("title")
        .normalization(1);

    let query = TsearchQuery::build(&blog_config(), "lifetimes", FindOptions::new(), &options)
        .expect("query builds");
    let sql = query.to_sql();

    assert!(sql.contains("ts_rank_cd(blog_entries.title_vector, tsearch_query, 1) as tsearch_rank"));
    assert!(sql.contains(
        "ts_headline('english', blog_entries.title, tsearch_query) as title_headline"
    ));
    assert!(sql.contains("FROM to_tsquery('english', $1) as tsearch_query, blog_entries"));
}

#[test]
fn test_search_errors() {
    let config = blog_config();

    assert!(matches!(
        TsearchQuery::build(&config, "", FindOptions::new(), &TsearchOptions::default()),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        TsearchQuery::build(
            &config,
            "rust",
            FindOptions::new(),
            &TsearchOptions::default().vector("body_vector")
        ),
        Err(Error::Config(_))
    ));
}

// ========== VECTOR REFRESH ==========

#[test]
fn test_refresh_statement_for_joined_vector() {
    let stmt = update_vector_sql(&blog_config(), "vectors", None).expect("statement builds");

    assert!(stmt.sql.starts_with("update blog_entries set vectors = setweight("));
    assert!(stmt.sql.contains(" from blog_entries b2 left outer join blog_comments"));
    assert!(stmt.sql.ends_with(" where b2.id = blog_entries.id"));
    assert_eq!(stmt.row_id, None);
}

#[test]
fn test_refresh_statement_for_single_row() {
    let stmt = update_vector_sql(&blog_config(), "title_vector", Some(42)).expect("statement builds");

    assert_eq!(
        stmt.sql,
        "update blog_entries set title_vector = to_tsvector('english', coalesce(title,'')) \
         where blog_entries.id = $1"
    );
    assert_eq!(stmt.row_id, Some(42));
}
