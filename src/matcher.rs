//! Answer matching
//!
//! A guess is correct when its normalized form contains any accepted string.
//! Containment (not equality) is intentional so conversational answers
//! like "i think its naruto" still count.

use crate::normalize::normalize;

/// Decide whether a raw guess matches any of the accepted strings.
///
/// Accepted strings are expected to be normalized already. Empty accepted
/// strings never match, so a guess that normalizes to nothing is always wrong.
pub fn is_correct<'a, I>(guess_raw: &str, accepted: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let guess = normalize(guess_raw);
    if guess.is_empty() {
        return false;
    }

    accepted
        .into_iter()
        .any(|candidate| !candidate.is_empty() && guess.contains(candidate.as_str()))
}
