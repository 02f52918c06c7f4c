//! Book card presentation.
//!
//! Flattens a [`NormalizedBook`] into the strings a results grid shows, so
//! that every client renders the same fallbacks and labels.

use crate::catalog::types::NormalizedBook;
use serde::Serialize;

pub const PLACEHOLDER_COVER: &str = "/placeholder.svg";
pub const DEFAULT_SITE_URL: &str = "https://openlibrary.org";

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_YEAR: &str = "N/A";
const SUMMARY_FALLBACK: &str = "Click to explore this book on Open Library";
const SUMMARY_MAX_CHARS: usize = 150;
const VISIBLE_CATEGORIES: usize = 2;

#[derive(Debug, Clone)]
pub struct CardOptions {
    /// Base URL of the catalog website, used for work links.
    pub site_url: String,
    pub placeholder_cover: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            placeholder_cover: PLACEHOLDER_COVER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub authors: String,
    pub published: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    pub categories: Vec<String>,
    /// Number of categories not shown on the card.
    pub more_categories: usize,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub full_text: bool,
    pub link: String,
}

impl BookCard {
    pub fn from_book(book: &NormalizedBook, options: &CardOptions) -> Self {
        let authors = if book.authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            book.authors.join(", ")
        };

        let published = if book.published_date.is_empty() {
            UNKNOWN_YEAR.to_string()
        } else {
            book.published_date.clone()
        };

        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            cover: book
                .cover_image()
                .unwrap_or(&options.placeholder_cover)
                .to_string(),
            authors,
            published,
            editions: book
                .edition_count
                .filter(|count| *count > 1)
                .map(|count| format!("{} editions", count)),
            pages: book
                .page_count
                .filter(|pages| *pages > 0)
                .map(|pages| format!("{} pages", pages)),
            categories: book
                .categories
                .iter()
                .take(VISIBLE_CATEGORIES)
                .cloned()
                .collect(),
            more_categories: book.categories.len().saturating_sub(VISIBLE_CATEGORIES),
            summary: summarize(&book.description),
            publisher: book.publisher.first().cloned(),
            full_text: book.has_fulltext,
            link: work_url(&options.site_url, &book.id),
        }
    }
}

/// Link to the work page on the catalog website.
pub fn work_url(site_url: &str, id: &str) -> String {
    let site_url = site_url.trim_end_matches('/');
    if id.starts_with("/works/") {
        format!("{}{}", site_url, id)
    } else {
        format!("{}/works/{}", site_url, id)
    }
}

fn summarize(description: &str) -> String {
    if description.is_empty() {
        return SUMMARY_FALLBACK.to_string();
    }
    if description.chars().count() <= SUMMARY_MAX_CHARS {
        return description.to_string();
    }
    let mut summary: String = description.chars().take(SUMMARY_MAX_CHARS).collect();
    summary.push_str("...");
    summary
}
