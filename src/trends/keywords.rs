//! Keyword extraction from listing titles.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Most keywords kept per title.
pub const MAX_KEYWORDS: usize = 12;

/// Generic apparel and marketing words that say nothing about a design.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "for", "to", "of", "with", "without", "adult", "youth", "kids",
    "men", "men's", "womens", "women's", "shirt", "t-shirt", "tshirt", "tee", "tank", "long",
    "sleeve", "short", "fit", "slim", "classic", "heavyweight", "lightweight", "novelty", "funny",
    "cool", "new", "official", "vintage", "retro", "graphic", "apparel", "clothing", "brand",
    "color", "colors", "size", "sizes",
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9']+").unwrap());

/// Distinct significant words of a title, lower-cased, in first-seen order.
///
/// Stop words and words of two characters or fewer are dropped; at most
/// `MAX_KEYWORDS` are returned.
pub fn extract_keywords(title: Option<&str>) -> Vec<String> {
    let Some(title) = title else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    WORD.find_iter(title)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .filter(|word| seen.insert(word.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}
