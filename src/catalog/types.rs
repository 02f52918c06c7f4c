//! Catalog Data Types
//!
//! Wire structures returned by the Open Library search endpoint and the
//! normalized book record the rest of the crate works with.
//!
//! The catalog owns its own record shape and makes no guarantees about which
//! fields are present, so every field of [`CatalogRecord`] is optional and is
//! decoded leniently: a field carrying an unexpected JSON type is treated as
//! absent instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of the `docs` array returned by the catalog search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CatalogRecord {
    /// Work identifier, e.g. `/works/OL45804W`.
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_publish_year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub isbn: Option<Vec<String>>,
    /// Numeric cover reference used by the covers service.
    #[serde(default, deserialize_with = "lenient")]
    pub cover_i: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub subject: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub publisher: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub language: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_pages_median: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub edition_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_fulltext: Option<bool>,
}

/// Top-level body of a catalog search response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSearchResponse {
    #[serde(default, deserialize_with = "records")]
    pub docs: Vec<CatalogRecord>,
    #[serde(rename = "numFound", default, deserialize_with = "lenient")]
    pub num_found: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub start: Option<u64>,
    #[serde(rename = "numFoundExact", default, deserialize_with = "lenient")]
    pub num_found_exact: Option<bool>,
}

impl CatalogSearchResponse {
    /// Total number of matches reported by the catalog (0 when missing).
    pub fn total(&self) -> u64 {
        self.num_found.unwrap_or(0)
    }
}

/// Cover thumbnails of a book. Both sizes exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLinks {
    /// Medium-size cover, used as the primary card image.
    pub thumbnail: String,
    /// Small-size cover.
    pub small_thumbnail: String,
}

/// Canonical display record built from one [`CatalogRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBook {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published_date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_links: Option<CoverLinks>,
    pub categories: Vec<String>,
    pub publisher: Vec<String>,
    pub isbn: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u32>,
    pub language: String,
    pub has_fulltext: bool,
}

impl NormalizedBook {
    pub fn cover_image(&self) -> Option<&str> {
        self.image_links.as_ref().map(|links| links.thumbnail.as_str())
    }

    pub fn small_cover_image(&self) -> Option<&str> {
        self.image_links
            .as_ref()
            .map(|links| links.small_thumbnail.as_str())
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Keeps the string entries of an array and drops anything else.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Decodes the `docs` array, skipping entries that are not JSON objects.
fn records<'de, D>(deserializer: D) -> Result<Vec<CatalogRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
