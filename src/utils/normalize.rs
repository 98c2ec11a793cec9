//! Key normalization for matching words across independently authored sources.
//!
//! A dictionary and a tagged corpus rarely agree on accents, breathing marks or
//! capitalization, so every cross-source join goes through [`normalize_key`]:
//! case-fold, canonical decomposition, removal of combining marks,
//! recomposition, and trimming of boundary punctuation.
//!
//! # Examples
//!
//! ```
//! use lexicon::utils::normalize_key;
//!
//! assert_eq!(normalize_key("ἀγάπη"), normalize_key("αγαπη"));
//! assert_eq!(normalize_key("Θεός,"), "θεος");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Non-ASCII punctuation that shows up around words in the corpus and dictionary.
const EXTRA_BOUNDARY_PUNCTUATION: &[char] = &[
    '\u{00B7}', // middle dot
    '\u{0387}', // greek ano teleia
    '\u{037E}', // greek question mark
    '\u{2019}', // right single quotation mark
    '\u{2E00}', // text-critical markers
    '\u{2E01}',
    '\u{2E02}',
    '\u{2E03}',
    '\u{2E04}',
    '\u{2E05}',
];

/// Punctuation stripped from the end of a corpus surface form.
pub const SURFACE_FORM_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '\u{00B7}', '\u{0387}'];

/// Returns true for characters trimmed from both ends of a normalized key.
pub fn is_boundary_punctuation(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || EXTRA_BOUNDARY_PUNCTUATION.contains(&c)
}

/// Canonicalizes a word for cross-source matching.
///
/// Two strings that differ only in diacritics, case or surrounding
/// punctuation produce the same key. The function is idempotent.
pub fn normalize_key(text: &str) -> String {
    // Case-fold before decomposing: lowercasing can itself emit combining marks (U+0130).
    let folded = text.to_lowercase();
    let stripped: String = folded
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    let recomposed: String = stripped.nfc().collect();
    recomposed.trim_matches(is_boundary_punctuation).to_string()
}

/// Case-folds a romanized form for the transliteration index.
pub fn normalize_transliteration(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Strips trailing punctuation from a surface word form.
pub fn clean_surface_form(word: &str) -> &str {
    word.trim_end_matches(SURFACE_FORM_TRAILING_PUNCTUATION)
}

/// Canonicalizes an entry identifier against the lexicon's prefix letter.
///
/// `"25"`, `"g25"`, `"G0025"` all become `"G25"` for prefix `"G"`.
pub fn normalize_id(id: &str, prefix: &str) -> String {
    let id = id.trim().to_uppercase();
    let prefix = prefix.to_uppercase();
    let body = id.strip_prefix(prefix.as_str()).unwrap_or(id.as_str());
    let body = if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = body.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    } else {
        body
    };
    format!("{}{}", prefix, body)
}
