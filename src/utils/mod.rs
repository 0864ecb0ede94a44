//! Shared utility functions.
//!
//! - `html`: text cleanup for values scraped out of HTML

mod html;

pub use html::{clean_text, element_text};
