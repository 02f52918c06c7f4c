//! Search Service Module
//!
//! Drives a search from user submission to what the results area displays.
//!
//! ## Overview
//! A submission is trimmed and keyed by `(text, scope)`. Empty text never
//! reaches the catalog. Otherwise the session moves to `loading`, answers from
//! the result cache when a fresh entry exists, and falls back to the catalog.
//! The outcome is committed as `success`, `empty` or `error`, unless a newer
//! submission has superseded it in the meantime.
//!
//! ## Submodules
//! - **`session`**: The orchestration and the stale-response check.
//! - **`registry`**: One session per client, all sharing the result cache.
//! - **`cache`**: Fixed-TTL cache of completed searches.
//! - **`state`**: `QueryKey` and the `SearchState` lifecycle.
//! - **`cards`**: Display-ready book cards.
//! - **`suggestions`**: Curated suggestions offered in the search box.
//! - **`handlers`**: HTTP handlers for the Axum web server.

pub mod cache;
pub mod cards;
pub mod handlers;
pub mod registry;
pub mod session;
pub mod state;
pub mod suggestions;
