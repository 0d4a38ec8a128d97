//! Locale-aware string collation used when sorting table rows.
//!
//! Text cells compare under the `zh-Hant-TW` collation with numeric ordering
//! on: Han characters follow stroke order, accented Latin sorts next to its
//! base letter, and runs of digits compare by numeric value, so `"item2"`
//! sorts before `"item10"`.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Numeric};
use icu_locid::locale;

fn build_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.numeric = Some(Numeric::On);
    match Collator::try_new(&locale!("zh-Hant-TW").into(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            tracing::warn!(error = %err, "zh-Hant-TW collator unavailable, sorting by code point");
            None
        }
    }
}

thread_local! {
    static COLLATOR: Option<Collator> = build_collator();
}

/// Compares two strings the way the table sorts text cells.
///
/// Total and deterministic: strings the collator considers equal fall back
/// to plain byte order, so only identical strings compare `Equal`.
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.as_ref().map_or(Ordering::Equal, |c| c.compare(a, b)))
        .then_with(|| a.cmp(b))
}
