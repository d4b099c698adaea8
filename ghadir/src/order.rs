//! Display ordering for hadith numbers.
//!
//! Hadith numbers are strings and may carry a compound "main/sub" shape
//! ("12/3"). Lexical string order breaks both forms ("10" before "2",
//! "12/10" before "12/2"), so chapter views sort with this comparator
//! instead of relying on store-level ordering.

use crate::store::Hadith;
use std::cmp::Ordering;

/// Parses a display number into its (main, sub) pair. Unparsable parts
/// and missing numbers collapse to zero.
pub fn parse_hadith_number(raw: Option<&str>) -> (i64, i64) {
    let Some(raw) = raw else {
        return (0, 0);
    };
    match raw.split_once('/') {
        Some((main, sub)) => (
            main.trim().parse().unwrap_or(0),
            sub.trim().parse().unwrap_or(0),
        ),
        None => (raw.trim().parse().unwrap_or(0), 0),
    }
}

/// Main ascending, then sub ascending.
pub fn compare_numbers(a: Option<&str>, b: Option<&str>) -> Ordering {
    parse_hadith_number(a).cmp(&parse_hadith_number(b))
}

/// Stable in-place sort, so rows with equal (or unparsable) numbers keep
/// their store order.
pub fn sort_hadiths(hadiths: &mut [Hadith]) {
    hadiths.sort_by(|a, b| compare_numbers(a.hadith_number.as_deref(), b.hadith_number.as_deref()));
}
