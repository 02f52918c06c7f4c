//! Result Transformer
//!
//! Maps catalog records onto [`NormalizedBook`]. Every field has an explicit
//! default so the mapping never fails, whatever subset of fields the catalog
//! returned.

use super::types::{CatalogRecord, CatalogSearchResponse, CoverLinks, NormalizedBook};

pub const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org/b";

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const DEFAULT_LANGUAGE: &str = "en";

const MAX_CATEGORIES: usize = 5;
const MAX_PUBLISHERS: usize = 3;
const MAX_ISBNS: usize = 2;

/// Size codes understood by the covers service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    pub fn code(&self) -> char {
        match self {
            CoverSize::Small => 'S',
            CoverSize::Medium => 'M',
            CoverSize::Large => 'L',
        }
    }
}

pub fn cover_image_url(covers_base: &str, cover_id: i64, size: CoverSize) -> String {
    format!(
        "{}/id/{}-{}.jpg",
        covers_base.trim_end_matches('/'),
        cover_id,
        size.code()
    )
}

/// Normalizes a record using the public covers service.
pub fn normalize(record: &CatalogRecord) -> NormalizedBook {
    normalize_with_covers(record, DEFAULT_COVERS_URL)
}

pub fn normalize_with_covers(record: &CatalogRecord, covers_base: &str) -> NormalizedBook {
    // A zero cover id means "no cover" in catalog responses.
    let image_links = record
        .cover_i
        .filter(|id| *id != 0)
        .map(|id| CoverLinks {
            thumbnail: cover_image_url(covers_base, id, CoverSize::Medium),
            small_thumbnail: cover_image_url(covers_base, id, CoverSize::Small),
        });

    NormalizedBook {
        id: record.key.clone().unwrap_or_default(),
        title: record
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNKNOWN_TITLE)
            .to_string(),
        authors: record.author_name.clone().unwrap_or_default(),
        published_date: record
            .first_publish_year
            .filter(|year| *year != 0)
            .map(|year| year.to_string())
            .unwrap_or_default(),
        description: String::new(),
        image_links,
        categories: capped(record.subject.as_deref(), MAX_CATEGORIES),
        publisher: capped(record.publisher.as_deref(), MAX_PUBLISHERS),
        isbn: capped(record.isbn.as_deref(), MAX_ISBNS),
        page_count: record.number_of_pages_median,
        edition_count: record.edition_count,
        language: record
            .language
            .as_deref()
            .and_then(|langs| langs.first())
            .filter(|lang| !lang.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        has_fulltext: record.has_fulltext.unwrap_or(false),
    }
}

/// Normalizes every record of a response, keeping the catalog's order.
pub fn normalize_all(response: &CatalogSearchResponse, covers_base: &str) -> Vec<NormalizedBook> {
    response
        .docs
        .iter()
        .map(|record| normalize_with_covers(record, covers_base))
        .collect()
}

fn capped(values: Option<&[String]>, max: usize) -> Vec<String> {
    values
        .map(|values| values.iter().take(max).cloned().collect())
        .unwrap_or_default()
}
