//! Search Orchestration
//!
//! `SearchSession` owns the view state of one user. It decides whether a
//! submission triggers a request, consults the result cache, issues the
//! catalog call and commits the outcome.
//!
//! ## Stale responses
//! Each submission takes a [`Ticket`] (a monotonically increasing generation
//! plus the query key). Only the response whose ticket matches the pending one
//! is committed; anything older is dropped without touching state or cache.
//! The state lock is never held across the catalog call.

use super::cache::ResultCache;
use super::state::{QueryKey, SearchPage, SearchState};
use crate::catalog::client::CatalogSource;
use crate::catalog::query::{DEFAULT_LIMIT, SearchRequest, SearchScope};
use crate::catalog::transform::{DEFAULT_COVERS_URL, normalize_all};

use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ticket {
    generation: u64,
    key: QueryKey,
}

struct SessionInner {
    state: SearchState,
    last_query: Option<QueryKey>,
    generation: u64,
}

pub struct SearchSession {
    source: Arc<dyn CatalogSource>,
    cache: Arc<ResultCache>,
    limit: usize,
    covers_base: String,
    inner: RwLock<SessionInner>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn CatalogSource>, cache: Arc<ResultCache>) -> Self {
        Self {
            source,
            cache,
            limit: DEFAULT_LIMIT,
            covers_base: DEFAULT_COVERS_URL.to_string(),
            inner: RwLock::new(SessionInner {
                state: SearchState::Idle,
                last_query: None,
                generation: 0,
            }),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_covers_base(mut self, covers_base: &str) -> Self {
        self.covers_base = covers_base.trim_end_matches('/').to_string();
        self
    }

    pub async fn state(&self) -> SearchState {
        self.inner.read().await.state.clone()
    }

    pub async fn last_query(&self) -> Option<QueryKey> {
        self.inner.read().await.last_query.clone()
    }

    /// Submits a search. Whitespace-only text issues nothing and leaves the
    /// current state untouched.
    pub async fn submit(&self, raw_text: &str, scope: SearchScope) -> SearchState {
        match QueryKey::new(raw_text, scope) {
            Some(key) => self.run(key, true).await,
            None => {
                tracing::debug!("Ignoring empty search submission");
                self.state().await
            }
        }
    }

    /// Re-issues the last submitted query, dropping its cached result first.
    /// Returns `None` when nothing has been searched yet.
    pub async fn retry(&self) -> Option<SearchState> {
        let key = self.last_query().await?;
        tracing::info!("Retrying search {}", key);
        self.cache.invalidate(&key);
        Some(self.run(key, false).await)
    }

    /// Returns to `idle` and forgets the last query. Responses still in flight
    /// are discarded when they arrive.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.state = SearchState::Idle;
        inner.last_query = None;
    }

    async fn run(&self, key: QueryKey, use_cache: bool) -> SearchState {
        let ticket = self.begin(&key).await;

        if use_cache {
            if let Some(page) = self.cache.get(&key) {
                tracing::info!("Cache hit for {} ({} books)", key, page.books.len());
                return self.commit(&ticket, Ok(page), false).await;
            }
        }

        tracing::info!("Searching catalog for {}", key);
        let request = SearchRequest::with_limit(&key.text, key.scope, self.limit);
        let outcome = match self.source.search(&request).await {
            Ok(response) => Ok(SearchPage {
                total: response.total(),
                books: normalize_all(&response, &self.covers_base),
            }),
            Err(e) => {
                tracing::error!("Search {} failed: {}", key, e);
                Err(e.to_string())
            }
        };

        self.commit(&ticket, outcome, true).await
    }

    async fn begin(&self, key: &QueryKey) -> Ticket {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.state = SearchState::Loading { query: key.clone() };
        inner.last_query = Some(key.clone());

        Ticket {
            generation: inner.generation,
            key: key.clone(),
        }
    }

    async fn commit(
        &self,
        ticket: &Ticket,
        outcome: Result<SearchPage, String>,
        store: bool,
    ) -> SearchState {
        let mut inner = self.inner.write().await;

        let pending = matches!(
            &inner.state,
            SearchState::Loading { query } if *query == ticket.key
        );
        if inner.generation != ticket.generation || !pending {
            tracing::debug!("Discarding stale response for {}", ticket.key);
            return inner.state.clone();
        }

        let key = ticket.key.clone();
        let state = match outcome {
            Ok(page) => {
                if store {
                    self.cache.insert(key.clone(), page.clone());
                }
                SearchState::from_page(key, page)
            }
            Err(message) => SearchState::Error {
                query: key,
                message,
            },
        };

        tracing::info!("Search {} -> {}", ticket.key, state.name());
        inner.state = state.clone();
        state
    }
}
