//! Deterministic completeness/trust scoring for surviving records.

use dmap_core::{BusinessStatus, Record};

/// Sum of the maxima of the five scoring groups: 4 (required fields)
/// + 1.5 (verification) + 1 (reviews) + 1 (rating) + 1 (photos).
const MAX_SCORE: f64 = 8.5;

/// Score a record's data completeness and trust signals on `[0, 1]`,
/// rounded to two decimals.
///
/// Five weighted groups are summed and divided by the combined maximum
/// (one normalization at the end, not per group). Missing numeric
/// fields count as zero; the function is total over any record.
#[must_use]
pub fn score(record: &Record) -> f64 {
    let mut achieved = 0.0;

    // Required-field presence.
    if record.has_name() {
        achieved += 1.0;
    }
    if record.has_phone() {
        achieved += 1.0;
    }
    if record.has_address() {
        achieved += 1.0;
    }
    if record.has_website() {
        achieved += 1.0;
    }

    // Verification signals.
    if record.verified.unwrap_or(false) {
        achieved += 1.0;
    }
    if matches!(record.business_status, Some(BusinessStatus::Operational)) {
        achieved += 0.5;
    }

    // Review volume.
    achieved += match record.review_count.unwrap_or(0) {
        50.. => 1.0,
        20..=49 => 0.7,
        5..=19 => 0.4,
        1..=4 => 0.2,
        0 => 0.0,
    };

    // Rating.
    let rating = record.rating.unwrap_or(0.0);
    achieved += if rating >= 4.5 {
        1.0
    } else if rating >= 4.0 {
        0.7
    } else if rating >= 3.5 {
        0.4
    } else {
        0.0
    };

    // Photo count.
    achieved += match record.photo_count.unwrap_or(0) {
        10.. => 1.0,
        5..=9 => 0.6,
        1..=4 => 0.3,
        0 => 0.0,
    };

    round2(achieved / MAX_SCORE)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
