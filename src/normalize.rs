//! Text canonicalization for answer comparison
//!
//! Guesses and accepted names go through the same pipeline so that
//! case, punctuation, digits and spacing never decide a match.
//! Only lowercase Latin letters, the Arabic block and whitespace survive.

/// First and last code point of the Arabic block
const ARABIC_RANGE: std::ops::RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

/// Whether a (lowercased) character is kept by [`normalize`]
fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase() || ARABIC_RANGE.contains(&c) || c.is_whitespace()
}

/// Canonicalize free text for comparison.
///
/// Lowercases, drops everything except `a-z`, Arabic letters and whitespace,
/// then trims and collapses whitespace runs into a single space.
/// Never fails: unrecognized characters are dropped.
pub fn normalize(text: &str) -> String {
    let filtered: String = text.to_lowercase().chars().filter(|c| is_kept(*c)).collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
