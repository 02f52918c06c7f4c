//! Query Normalizer
//!
//! Turns the text typed by the user and the selected search scope into the
//! request sent to the catalog search endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of records requested per search.
pub const DEFAULT_LIMIT: usize = 20;

/// Record fields requested from the catalog. Restricting the selection keeps
/// response payloads small; every name here is read by the transformer.
pub const SEARCH_FIELDS: &[&str] = &[
    "key",
    "title",
    "author_name",
    "first_publish_year",
    "isbn",
    "cover_i",
    "subject",
    "publisher",
    "language",
    "number_of_pages_median",
    "edition_count",
    "has_fulltext",
];

/// The record field a query is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Title,
    Author,
    Subject,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Title => "title",
            SearchScope::Author => "author",
            SearchScope::Subject => "subject",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search scope '{0}' (expected all, title, author or subject)")]
pub struct UnknownScope(pub String);

impl FromStr for SearchScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SearchScope::All),
            "title" => Ok(SearchScope::Title),
            "author" => Ok(SearchScope::Author),
            "subject" => Ok(SearchScope::Subject),
            _ => Err(UnknownScope(s.to_string())),
        }
    }
}

/// Builds the `q` parameter for a search.
///
/// Scoped searches use the catalog's field-qualified syntax (`title:dune`).
/// The text is not escaped: a colon inside it reaches the catalog as-is.
/// Callers must not search when the trimmed text is empty.
pub fn build_query(raw_text: &str, scope: SearchScope) -> String {
    let text = raw_text.trim();
    match scope {
        SearchScope::All => text.to_string(),
        scoped => format!("{}:{}", scoped.as_str(), text),
    }
}

/// A fully parameterized request to the catalog search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub fields: String,
}

impl SearchRequest {
    pub fn new(raw_text: &str, scope: SearchScope) -> Self {
        Self::with_limit(raw_text, scope, DEFAULT_LIMIT)
    }

    pub fn with_limit(raw_text: &str, scope: SearchScope, limit: usize) -> Self {
        Self {
            query: build_query(raw_text, scope),
            limit,
            fields: SEARCH_FIELDS.join(","),
        }
    }

    /// Query parameters in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.query.clone()),
            ("limit", self.limit.to_string()),
            ("fields", self.fields.clone()),
        ]
    }

    /// Renders the full GET URL against `endpoint`.
    pub fn url(&self, endpoint: &str) -> String {
        let query = self
            .params()
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", endpoint.trim_end_matches('?'), query)
    }
}
