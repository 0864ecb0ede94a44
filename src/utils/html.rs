//! Text helpers for scraped HTML.

use scraper::ElementRef;

/// Collapse runs of whitespace and trim. Empty results become `None`.
pub fn clean_text(s: &str) -> Option<String> {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Visible text of an element, cleaned.
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    clean_text(&element.text().collect::<String>())
}
