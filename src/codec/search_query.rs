//! Search query codec.
//!
//! Query strings have the shape `freeText[:sort][:key:value]*`. Delimiters
//! embedded in free text, sort or term values are not escaped, so a value
//! containing `:` does not survive an encode/decode cycle.

use serde::{Deserialize, Serialize};

use crate::codec::error::{FilterError, FilterResult};

const DELIMITER: char = ':';

/// Index of the first term key.
const FIRST_TERM: usize = 2;

/// A single `key:value` filter term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQueryTerm {
    pub key: String,
    pub value: String,
}

impl SearchQueryTerm {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Structured form of a search query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchQuery {
    pub free_text: Option<String>,
    pub sort: Option<String>,
    pub terms: Vec<SearchQueryTerm>,
}

/// Converts between a compact query string and a structured query.
pub trait SearchQueryCodec<Q> {
    /// Decode a query string. `None` decodes to an empty query.
    fn decode_query(&self, query: Option<&str>) -> FilterResult<Q>;

    /// Encode a query. `None` encodes to `None`.
    fn encode_query(&self, query: Option<&Q>) -> Option<String>;
}

/// The `freeText:sort:key:value` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSearchQueryCodec;

impl SearchQueryCodec<SearchQuery> for DefaultSearchQueryCodec {
    fn decode_query(&self, query: Option<&str>) -> FilterResult<SearchQuery> {
        let Some(raw) = query else {
            return Ok(SearchQuery::default());
        };

        let parts = split_tokens(raw);
        let mut decoded = SearchQuery {
            free_text: parts.first().map(|s| s.to_string()),
            sort: parts.get(1).map(|s| s.to_string()),
            terms: Vec::new(),
        };

        if parts.len() > FIRST_TERM {
            for pair in parts[FIRST_TERM..].chunks(2) {
                match pair {
                    [key, value] => decoded.terms.push(SearchQueryTerm::new(*key, *value)),
                    // A dangling key would otherwise be read past the end.
                    _ => {
                        return Err(FilterError::MalformedQuery {
                            query: raw.to_string(),
                            key: pair[0].to_string(),
                        })
                    }
                }
            }
        }

        tracing::trace!(query = %raw, terms = decoded.terms.len(), "Decoded search query");
        Ok(decoded)
    }

    fn encode_query(&self, query: Option<&SearchQuery>) -> Option<String> {
        let query = query?;
        let mut out = String::new();
        out.push_str(query.free_text.as_deref().unwrap_or_default());

        if query.sort.is_some() || !query.terms.is_empty() {
            out.push(DELIMITER);
            out.push_str(query.sort.as_deref().unwrap_or_default());
        }

        for term in &query.terms {
            out.push(DELIMITER);
            out.push_str(&term.key);
            out.push(DELIMITER);
            out.push_str(&term.value);
        }

        Some(out)
    }
}

/// Split on the delimiter, dropping trailing empty tokens.
///
/// Input without any delimiter is returned as a single token, even when empty.
fn split_tokens(raw: &str) -> Vec<&str> {
    if !raw.contains(DELIMITER) {
        return vec![raw];
    }
    let mut parts: Vec<&str> = raw.split(DELIMITER).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}
