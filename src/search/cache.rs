//! Result Cache
//!
//! Keeps completed searches for a fixed freshness window so that repeating a
//! query shortly afterwards does not hit the catalog again. Entries are keyed
//! by `(text, scope)` and carry the instant they were stored; a stale entry is
//! dropped the first time it is read.

use super::state::{QueryKey, SearchPage};

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Freshness window used when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    page: SearchPage,
    stored_at: Instant,
}

pub struct ResultCache {
    entries: DashMap<QueryKey, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a copy of the cached page if it is still fresh.
    pub fn get(&self, key: &QueryKey) -> Option<SearchPage> {
        let fresh = {
            let entry = self.entries.get(key)?;
            if entry.stored_at.elapsed() < self.ttl {
                Some(entry.page.clone())
            } else {
                None
            }
        };

        if fresh.is_none() {
            tracing::debug!("Cache entry for {} expired", key);
            let ttl = self.ttl;
            self.entries
                .remove_if(key, |_, entry| entry.stored_at.elapsed() >= ttl);
        }
        fresh
    }

    pub fn insert(&self, key: QueryKey, page: SearchPage) {
        self.entries.insert(
            key,
            CacheEntry {
                page,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
