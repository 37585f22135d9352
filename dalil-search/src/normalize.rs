//! Arabic text normalization for search matching
//!
//! Canonical form used on both sides of every substring comparison. Steps run
//! in a fixed order; whitespace handling comes after character removal so
//! that a stripped mark between two spaces still collapses.

/// Alif with hamza above, hamza below, madda and the bare letter
const ALIF_VARIANTS: [char; 4] = ['\u{0623}', '\u{0625}', '\u{0622}', '\u{0627}'];
const ALIF: char = '\u{0627}';

/// Dotted yaa and alif maksura
const YAA_VARIANTS: [char; 2] = ['\u{064A}', '\u{0649}'];
const YAA: char = '\u{064A}';

const TAA_MARBUTA: char = '\u{0629}';
const HAA: char = '\u{0647}';

/// Harakat and tanween (fathatan through sukun)
const DIACRITICS: std::ops::RangeInclusive<char> = '\u{064B}'..='\u{0652}';
const TATWEEL: char = '\u{0640}';

/// Canonicalize text for matching. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let letters: String = text
        .chars()
        .filter_map(|c| match c {
            c if ALIF_VARIANTS.contains(&c) => Some(ALIF),
            c if YAA_VARIANTS.contains(&c) => Some(YAA),
            TAA_MARBUTA => Some(HAA),
            c if DIACRITICS.contains(&c) || c == TATWEEL => None,
            c => Some(c),
        })
        .collect();

    letters
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
