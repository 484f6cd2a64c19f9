//! Provider-name canonicalization for duplicate detection.

use super::patterns::NON_ALNUM_RUN;
use super::text::strip_accents;

/// Legal-entity words dropped during normalization.
pub const LEGAL_SUFFIXES: &[&str] = &[
    "gmbh", "ug", "ag", "kg", "mbh", "co", "inc", "llc", "ltd", "the", "sll", "sl", "srl", "sa",
    "sas", "spa",
];

/// Canonicalize an organization name for equality comparison.
///
/// Lower-cases, strips accents, turns every run of non-alphanumeric
/// characters into a single space and removes whole-word legal suffixes.
/// The result is only used as a grouping key and never shown to operators.
pub fn normalize_provider(name: &str) -> String {
    let lowered = strip_accents(&name.trim().to_lowercase());
    let spaced = NON_ALNUM_RUN.replace_all(&lowered, " ");

    spaced
        .split_whitespace()
        .filter(|word| !is_legal_suffix(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_legal_suffix(word: &str) -> bool {
    LEGAL_SUFFIXES.contains(&word)
}
