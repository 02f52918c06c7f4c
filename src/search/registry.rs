//! Session Registry
//!
//! One [`SearchSession`] per client, addressed by an opaque session id. All
//! sessions share the catalog source and the result cache, so a query cached
//! for one client is served to every other client within the freshness window.
//! Sessions nobody touched for `max_idle` are dropped by [`SessionRegistry::purge_idle`].

use super::cache::ResultCache;
use super::session::SearchSession;
use crate::catalog::client::CatalogSource;
use crate::catalog::query::DEFAULT_LIMIT;
use crate::catalog::transform::DEFAULT_COVERS_URL;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Idle time after which a session is forgotten, when none is configured.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Identifier handed out to a client on its first search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a new random UUID v4-based SessionId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct SessionEntry {
    session: Arc<SearchSession>,
    last_seen: Instant,
}

pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionEntry>,
    source: Arc<dyn CatalogSource>,
    cache: Arc<ResultCache>,
    limit: usize,
    covers_base: String,
}

impl SessionRegistry {
    pub fn new(source: Arc<dyn CatalogSource>, cache: Arc<ResultCache>) -> Self {
        Self {
            sessions: DashMap::new(),
            source,
            cache,
            limit: DEFAULT_LIMIT,
            covers_base: DEFAULT_COVERS_URL.to_string(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_covers_base(mut self, covers_base: &str) -> Self {
        self.covers_base = covers_base.to_string();
        self
    }

    /// Starts a new session and returns its id.
    pub fn create(&self) -> (SessionId, Arc<SearchSession>) {
        let id = SessionId::new();
        let session = Arc::new(
            SearchSession::new(self.source.clone(), self.cache.clone())
                .with_limit(self.limit)
                .with_covers_base(&self.covers_base),
        );

        self.sessions.insert(
            id.clone(),
            SessionEntry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!("Created search session {}", id);
        (id, session)
    }

    /// Looks up an existing session and marks it as used.
    pub fn get(&self, id: &SessionId) -> Option<Arc<SearchSession>> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Returns the session for `id`, or a new one when `id` is absent or unknown.
    pub fn resolve(&self, id: Option<&SessionId>) -> (SessionId, Arc<SearchSession>) {
        if let Some(id) = id {
            if let Some(session) = self.get(id) {
                return (id.clone(), session);
            }
            tracing::debug!("Unknown session {}, starting a new one", id);
        }
        self.create()
    }

    /// Drops sessions idle for at least `max_idle`. Returns how many were removed.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < max_idle);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
