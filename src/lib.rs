//! Book Finder Library
//!
//! Book discovery on top of the Open Library search API. This library crate
//! holds all the logic; the binary (`main.rs`) only wires it behind an HTTP API.
//!
//! ## Modules
//! - **`catalog`**: The external catalog boundary. Builds the outbound query
//!   (scope prefixes, result cap, field selection), fetches it over HTTP and
//!   normalizes every returned record into a `NormalizedBook`.
//! - **`search`**: The search lifecycle. A per-user session with an explicit
//!   `idle / loading / success / empty / error` state, a fixed-TTL result cache,
//!   stale-response protection, card presentation and suggestions.
//! - **`config`**: Environment and command line configuration.

pub mod catalog;
pub mod config;
pub mod search;

#[cfg(test)]
mod testing;
