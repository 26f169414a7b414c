//! Text normalization for search
//!
//! Titles and names are stored alongside a normalized copy, and queries are
//! normalized the same way, so "cesky" matches "Český".

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strips diacritics and lowercases `text`
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
