//! Boilerplate filtering for free-text trigger/intervention fields.
//!
//! The extraction pipeline pads empty cells with placeholder sentences
//! ("Not specified in this format", "No progress note found within 24hrs of
//! RIM", ...). Counting those as triggers would drown the real signal, so
//! every fragment passes through [`is_noise`] before it reaches a frequency
//! table.

/// Fragments shorter than this (after trimming) carry no signal.
pub const MIN_FRAGMENT_CHARS: usize = 5;

/// Boilerplate markers, matched case-insensitively by substring containment
/// so longer sentences embedding one of them are excluded too.
const NOISE_PATTERNS: &[&str] = &[
    "no progress note found within 24hrs of rim",
    "not specified in this format",
    "n/a",
    "none",
    "unknown",
    "no data",
    "no information",
    "within 24hrs of rim",
];

/// Returns `true` if the fragment is boilerplate and must not be counted.
#[must_use]
pub fn is_noise(fragment: &str) -> bool {
    let lower = fragment.trim().to_lowercase();
    lower.chars().count() < MIN_FRAGMENT_CHARS || contains_any(&lower, NOISE_PATTERNS)
}

/// Splits a delimiter-separated free-text field into trimmed, non-empty
/// fragments. Fields are comma-, semicolon-, or newline-separated depending
/// on which extractor produced them.
pub fn split_fragments(text: &str) -> impl Iterator<Item = &str> {
    text.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
}

/// Checks if `haystack` contains any of the given `needles`.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
