use crate::catalog::query::SearchScope;
use crate::catalog::types::NormalizedBook;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a search: the trimmed text and the scope it was issued with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub text: String,
    pub scope: SearchScope,
}

impl QueryKey {
    /// Returns `None` for empty or whitespace-only text.
    pub fn new(raw_text: &str, scope: SearchScope) -> Option<Self> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            scope,
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.text, self.scope)
    }
}

/// Normalized books of one successful search, as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub total: u64,
    pub books: Vec<NormalizedBook>,
}

/// The lifecycle of the search view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SearchState {
    /// Nothing has been searched yet.
    Idle,
    /// A request for `query` is in flight.
    Loading { query: QueryKey },
    /// The catalog returned at least one record.
    Success {
        query: QueryKey,
        total: u64,
        books: Vec<NormalizedBook>,
    },
    /// The catalog answered with zero records. Not a failure.
    Empty { query: QueryKey },
    /// The request failed at transport level or with a non-2xx status.
    Error { query: QueryKey, message: String },
}

impl SearchState {
    /// Terminal state for a completed search.
    pub fn from_page(query: QueryKey, page: SearchPage) -> Self {
        if page.books.is_empty() {
            SearchState::Empty { query }
        } else {
            SearchState::Success {
                query,
                total: page.total,
                books: page.books,
            }
        }
    }

    pub fn query(&self) -> Option<&QueryKey> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { query }
            | SearchState::Success { query, .. }
            | SearchState::Empty { query }
            | SearchState::Error { query, .. } => Some(query),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading { .. } => "loading",
            SearchState::Success { .. } => "success",
            SearchState::Empty { .. } => "empty",
            SearchState::Error { .. } => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    pub fn books(&self) -> &[NormalizedBook] {
        match self {
            SearchState::Success { books, .. } => books,
            _ => &[],
        }
    }
}
