//! Catalog Module
//!
//! Everything that talks about the external Open Library catalog: building the
//! outbound search request, fetching it, and normalizing the records it returns.
//!
//! ## Submodules
//! - **`query`**: Query Normalizer. Scope handling, the `q` string and fixed request parameters.
//! - **`client`**: The `CatalogSource` seam and its reqwest implementation.
//! - **`transform`**: Result Transformer. Total mapping from catalog records to `NormalizedBook`.
//! - **`types`**: Wire types of the catalog response and the normalized record.

pub mod client;
pub mod query;
pub mod transform;
pub mod types;

pub use client::{CatalogClient, CatalogError, CatalogSource};
pub use query::{SearchRequest, SearchScope, build_query};
pub use transform::normalize;
pub use types::{CatalogRecord, CatalogSearchResponse, CoverLinks, NormalizedBook};
