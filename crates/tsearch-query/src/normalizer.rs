//! Google-like query to tsquery translation.
//!
//! Users type queries such as `+rust -java "error handling" or panics`;
//! `to_tsquery` wants `rust&!java&(error&handling)|panics`. Translation is a
//! single pass:
//!
//! 1. [`clean_query`] drops everything except word characters, `-`, `+` and
//!    quotes, doubles single quotes and lower-cases.
//! 2. [`query_to_terms`] splits the cleaned text into [`Term`]s, each an
//!    optional operator prefix followed by a word or a quoted phrase.
//! 3. [`join_terms`] glues the terms together, omitting the first connector.
//!
//! The doubled quotes make the normalized text safe inside a SQL string
//! literal. When the text is bound as a parameter instead, use
//! [`tsquery_parameter`], which yields the value that literal denotes.
//!
//! A quoted phrase becomes an AND group of its words, `"a b"` → `(a&b)`.
//! That matches documents containing both words anywhere, not only adjacent
//! ones; this mirrors long-standing behavior and is kept on purpose.
//!
//! Everything here is total and side-effect free.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use tsearch_core::TsearchOptions;

static NON_QUERY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\-\+'"]+"#).expect("valid regex"));

static TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\+|or \-?|and \-?|\-)?("[^"]*"?|[\w\-]+)"#).expect("valid regex")
});

static PHRASE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").expect("valid regex"));

/// Boolean operator placed before a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "&",
            Connector::Or => "|",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connector and the phrase it applies to.
///
/// The phrase is a word (`rust`), a negated word (`!java`), or an AND group
/// for a quoted phrase (`(error&handling)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub connector: Connector,
    pub phrase: String,
}

impl Term {
    pub fn new(connector: Connector, phrase: impl Into<String>) -> Self {
        Self {
            connector,
            phrase: phrase.into(),
        }
    }
}

/// Reduce raw user input to the characters the tokenizer understands.
///
/// ```
/// use tsearch_query::normalizer::clean_query;
///
/// assert_eq!(clean_query("  Rust,  async/await! "), "rust async await");
/// assert_eq!(clean_query("it's"), "it''s");
/// ```
pub fn clean_query(query: &str) -> String {
    NON_QUERY_CHARS
        .replace_all(query, " ")
        .replace('\'', "''")
        .trim()
        .to_lowercase()
}

/// Split a cleaned query into terms.
///
/// Prefixes: `+` and `and` mean AND, `or` means OR, and a `-` (alone or after
/// `and`/`or`) negates the term. Unprefixed terms are ANDed.
///
/// A quoted phrase with no words in it yields no term. Runs of bare quotes
/// inside a phrase are not words.
pub fn query_to_terms(query: &str) -> Vec<Term> {
    TERM.captures_iter(query)
        .filter_map(|caps| {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());

            let mut phrase = if raw.starts_with('"') {
                let words: Vec<&str> = PHRASE_WORD
                    .find_iter(raw)
                    .map(|m| m.as_str())
                    .filter(|w| w.chars().any(|c| c.is_alphanumeric() || c == '_'))
                    .collect();
                if words.is_empty() {
                    return None;
                }
                format!("({})", words.join("&"))
            } else {
                raw.to_string()
            };

            if prefix.contains('-') {
                phrase.insert(0, '!');
            }

            let connector = if prefix.contains("or") {
                Connector::Or
            } else {
                Connector::And
            };

            Some(Term::new(connector, phrase))
        })
        .collect()
}

/// Concatenate terms into a tsquery string, dropping the leading connector.
pub fn join_terms(terms: &[Term]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            out.push_str(term.connector.as_str());
        }
        out.push_str(&term.phrase);
    }
    out
}

/// Translate a Google-like query into `to_tsquery` syntax.
///
/// ```
/// use tsearch_query::normalizer::normalize_query;
///
/// assert_eq!(normalize_query("cats or dogs"), "cats|dogs");
/// assert_eq!(normalize_query("\"hello world\""), "(hello&world)");
/// assert_eq!(normalize_query("+required -excluded optional"), "required&!excluded&optional");
/// assert_eq!(normalize_query(""), "");
/// ```
pub fn normalize_query(query: &str) -> String {
    join_terms(&query_to_terms(&clean_query(query)))
}

/// Normalize `query` unless the options ask for raw tsquery input.
pub fn fix_tsearch_query(query: &str, options: &TsearchOptions) -> String {
    if options.fix_query {
        normalize_query(query)
    } else {
        query.to_string()
    }
}

/// Value to bind for `to_tsquery($1)`.
///
/// Normalized text is undoubled back to the single quotes a SQL literal
/// would have produced; raw text is passed through untouched.
///
/// ```
/// use tsearch_query::normalizer::tsquery_parameter;
/// use tsearch_query::TsearchOptions;
///
/// let options = TsearchOptions::default();
/// assert_eq!(tsquery_parameter("\"rock 'n' roll\"", &options), "(rock&'n'&roll)");
/// ```
pub fn tsquery_parameter(query: &str, options: &TsearchOptions) -> String {
    if options.fix_query {
        normalize_query(query).replace("''", "'")
    } else {
        query.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '\'' || c == '-'))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    // ========== CLEANING ==========

    #[test]
    fn test_clean_collapses_punctuation_and_whitespace() {
        assert_eq!(clean_query("hello,   world!!"), "hello world");
        assert_eq!(clean_query("\tfoo\n\nbar  "), "foo bar");
        assert_eq!(clean_query("a;b:c/d"), "a b c d");
    }

    #[test]
    fn test_clean_keeps_operator_characters() {
        assert_eq!(clean_query("+Rust -Java \"Exact Phrase\""), "+rust -java \"exact phrase\"");
        assert_eq!(clean_query("state-of-the-art"), "state-of-the-art");
    }

    #[test]
    fn test_clean_doubles_single_quotes() {
        assert_eq!(clean_query("don't"), "don''t");
        assert_eq!(clean_query("'quoted'"), "''quoted''");
    }

    #[test]
    fn test_clean_lowercases_unicode() {
        assert_eq!(clean_query("ÜBER Café"), "über café");
    }

    #[test]
    fn test_clean_is_idempotent_on_plain_text() {
        for input in ["Hello World 42", "  many   spaces  ", "abc", "", "A1 b2 C3"] {
            let once = clean_query(input);
            assert_eq!(clean_query(&once), once, "input: {:?}", input);
        }
    }

    // ========== TOKENIZING ==========

    #[test]
    fn test_terms_plain_words_are_anded() {
        assert_eq!(
            query_to_terms("rust tokio"),
            vec![
                Term::new(Connector::And, "rust"),
                Term::new(Connector::And, "tokio")
            ]
        );
    }

    #[test]
    fn test_terms_prefixes() {
        let terms = query_to_terms("+a -b or c or -d and e and -f");
        assert_eq!(
            terms,
            vec![
                Term::new(Connector::And, "a"),
                Term::new(Connector::And, "!b"),
                Term::new(Connector::Or, "c"),
                Term::new(Connector::Or, "!d"),
                Term::new(Connector::And, "e"),
                Term::new(Connector::And, "!f"),
            ]
        );
    }

    #[test]
    fn test_terms_quoted_phrase() {
        assert_eq!(
            query_to_terms("\"error handling in rust\""),
            vec![Term::new(Connector::And, "(error&handling&in&rust)")]
        );
        assert_eq!(
            query_to_terms("-\"bad idea\""),
            vec![Term::new(Connector::And, "!(bad&idea)")]
        );
    }

    #[test]
    fn test_terms_unterminated_quote_takes_rest() {
        assert_eq!(
            query_to_terms("foo \"bar baz"),
            vec![
                Term::new(Connector::And, "foo"),
                Term::new(Connector::And, "(bar&baz)")
            ]
        );
    }

    #[test]
    fn test_terms_empty_quotes_are_dropped() {
        assert!(query_to_terms("\"\"").is_empty());
        assert_eq!(
            query_to_terms("\"\" or cats"),
            vec![Term::new(Connector::Or, "cats")]
        );
    }

    #[test]
    fn test_terms_words_starting_with_operators() {
        // "order" and "andes" are words, not "or"/"and" prefixes.
        assert_eq!(
            query_to_terms("order andes"),
            vec![
                Term::new(Connector::And, "order"),
                Term::new(Connector::And, "andes")
            ]
        );
    }

    #[test]
    fn test_terms_bare_operator_word_is_a_term() {
        assert_eq!(
            query_to_terms("cats or"),
            vec![
                Term::new(Connector::And, "cats"),
                Term::new(Connector::And, "or")
            ]
        );
    }

    #[test]
    fn test_terms_lone_plus_is_ignored() {
        assert_eq!(
            query_to_terms("+ cats"),
            vec![Term::new(Connector::And, "cats")]
        );
    }

    // ========== JOINING ==========

    #[test]
    fn test_join_drops_leading_connector() {
        let terms = vec![
            Term::new(Connector::Or, "a"),
            Term::new(Connector::And, "b"),
            Term::new(Connector::Or, "c"),
        ];
        assert_eq!(join_terms(&terms), "a&b|c");
        assert_eq!(join_terms(&[]), "");
    }

    #[test]
    fn test_connector_display() {
        assert_eq!(Connector::And.to_string(), "&");
        assert_eq!(Connector::Or.to_string(), "|");
    }

    // ========== NORMALIZING ==========

    #[test]
    fn test_normalize_quoted_phrase() {
        assert_eq!(normalize_query("\"hello world\""), "(hello&world)");
    }

    #[test]
    fn test_normalize_required_excluded_optional() {
        assert_eq!(
            normalize_query("+required -excluded optional"),
            "required&!excluded&optional"
        );
    }

    #[test]
    fn test_normalize_or() {
        assert_eq!(normalize_query("cats or dogs"), "cats|dogs");
        assert_eq!(normalize_query("Cats OR Dogs"), "cats|dogs");
        assert_eq!(normalize_query("cats or -dogs"), "cats|!dogs");
    }

    #[test]
    fn test_normalize_and() {
        assert_eq!(normalize_query("cats and dogs"), "cats&dogs");
        assert_eq!(normalize_query("cats and -dogs"), "cats&!dogs");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize_query(""), "");
        assert_eq!(normalize_query("   "), "");
        assert_eq!(normalize_query("!!! ??? ..."), "");
    }

    #[test]
    fn test_normalize_mixed_query() {
        assert_eq!(
            normalize_query("+rust -java \"error handling\" or panics"),
            "rust&!java&(error&handling)|panics"
        );
    }

    #[test]
    fn test_normalize_strips_tsquery_syntax() {
        // Raw tsquery operators typed by the user cannot leak through.
        assert_eq!(normalize_query("a & b | !c (d)"), "a&b&c&d");
        assert_eq!(normalize_query("foo:* bar"), "foo&bar");
    }

    #[test]
    fn test_normalize_apostrophes() {
        assert_eq!(normalize_query("don't panic"), "don&t&panic");
        assert_eq!(normalize_query("\"don't panic\""), "(don''t&panic)");
        assert_eq!(normalize_query("\"rock 'n' roll\""), "(rock&''n''&roll)");
    }

    #[test]
    fn test_normalize_drops_quote_only_phrase_words() {
        assert_eq!(normalize_query("rock \"'\""), "rock");
        assert_eq!(normalize_query("\"'' rock\""), "(rock)");
        assert_eq!(normalize_query("\"'\" or roll"), "roll");
    }

    #[test]
    fn test_tsquery_parameter_undoubles_quotes() {
        let options = TsearchOptions::default();
        assert_eq!(tsquery_parameter("\"rock 'n' roll\"", &options), "(rock&'n'&roll)");
        assert_eq!(tsquery_parameter("\"'quoted'\"", &options), "('quoted')");
        assert_eq!(tsquery_parameter("cats or dogs", &options), "cats|dogs");
        assert!(!tsquery_parameter("o'reilly \"it's\"", &options).contains("''"));
    }

    #[test]
    fn test_tsquery_parameter_passes_raw_text_through() {
        let raw = TsearchOptions::default().fix_query(false);
        assert_eq!(tsquery_parameter("'it''s' & !x", &raw), "'it''s' & !x");
    }

    #[test]
    fn test_normalize_hyphenated_words() {
        assert_eq!(normalize_query("state-of-the-art"), "state-of-the-art");
    }

    #[test]
    fn test_normalize_output_is_balanced() {
        for input in [
            "\"a b\" \"c d\" -\"e f\"",
            "\"unterminated phrase",
            "\"\" \"\" x",
            "(((nested)))",
            "\"'\"",
            "a \"''\" b",
            "-\"' '\" c",
        ] {
            let out = normalize_query(input);
            let opens = out.matches('(').count();
            let closes = out.matches(')').count();
            assert_eq!(opens, closes, "unbalanced output {:?} for {:?}", out, input);
            assert!(!out.contains("()"), "empty group in {:?}", out);
            assert!(!out.starts_with('&') && !out.starts_with('|'), "orphan operator in {:?}", out);
        }
    }

    #[test]
    fn test_normalize_preserves_words_in_order() {
        for input in [
            "Rust async runtime",
            "cats or dogs and birds",
            "+alpha -beta \"gamma delta\" epsilon",
        ] {
            let normalized = normalize_query(input);
            let expected: Vec<String> = words(&clean_query(input))
                .into_iter()
                .map(|w| w.trim_start_matches(&['+', '-'][..]).to_string())
                .filter(|w| w != "or" && w != "and")
                .collect();
            assert_eq!(words(&clean_query(&normalized)), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_fix_tsearch_query_respects_option() {
        let options = TsearchOptions::default();
        assert_eq!(fix_tsearch_query("cats or dogs", &options), "cats|dogs");

        let raw = TsearchOptions::default().fix_query(false);
        assert_eq!(fix_tsearch_query("cats & !dogs", &raw), "cats & !dogs");
    }
}
