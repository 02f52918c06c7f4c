//! Curated search suggestions shown under the search box.

/// Default number of suggestions offered while typing.
pub const MAX_SUGGESTIONS: usize = 5;

pub const SEARCH_SUGGESTIONS: &[&str] = &[
    // Academic subjects
    "Computer Science",
    "Psychology",
    "History",
    "Mathematics",
    "Biology",
    "Philosophy",
    "Economics",
    "Literature",
    // Genres
    "Science Fiction",
    "Self Help",
    "Biography",
    "Study Skills",
    "Programming",
    "Research Methods",
    // Classic authors
    "Shakespeare",
    "Jane Austen",
    "George Orwell",
    "Ernest Hemingway",
    "F. Scott Fitzgerald",
];

/// Suggestion groups, by theme.
pub const SEARCH_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "academic",
        &[
            "Textbooks",
            "Research Methods",
            "Study Guides",
            "Academic Writing",
            "Critical Thinking",
        ],
    ),
    (
        "fiction",
        &[
            "Classic Literature",
            "Contemporary Fiction",
            "Science Fiction",
            "Fantasy",
            "Mystery",
        ],
    ),
    (
        "nonFiction",
        &["Biography", "History", "Self Help", "Psychology", "Philosophy"],
    ),
    (
        "professional",
        &[
            "Career Development",
            "Leadership",
            "Business",
            "Technology",
            "Innovation",
        ],
    ),
];

/// Suggestions containing `query` (case-insensitive), excluding an exact match.
pub fn filter_suggestions(query: &str, max: usize) -> Vec<&'static str> {
    let needle = query.to_lowercase();
    SEARCH_SUGGESTIONS
        .iter()
        .copied()
        .filter(|suggestion| suggestion.to_lowercase().contains(&needle) && *suggestion != query)
        .take(max)
        .collect()
}

/// The first `n` suggestions, offered before any search is made.
pub fn featured(n: usize) -> Vec<&'static str> {
    SEARCH_SUGGESTIONS.iter().copied().take(n).collect()
}

pub fn category(name: &str) -> Option<&'static [&'static str]> {
    SEARCH_CATEGORIES
        .iter()
        .find(|(group, _)| *group == name)
        .map(|(_, entries)| *entries)
}
