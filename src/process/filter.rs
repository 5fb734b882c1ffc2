// src/process/filter.rs

use crate::process::normalize::NormalizedRecord;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Day-10 cutoff of the processing month.
///
/// The source document carries placeholder rows for months it has not
/// published yet; anything dated past this cutoff is forward-looking.
pub fn cutoff_date(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 10).expect("day 10 exists in every month")
}

/// Keep records dated at or before the cutoff that carry a usable rate.
///
/// The rate predicate re-asserts what the normalizer already guarantees for
/// absent cells; a NaN can only arrive through a literal not-a-number cell.
pub fn filter_records(records: Vec<NormalizedRecord>, today: NaiveDate) -> Vec<NormalizedRecord> {
    let cutoff = cutoff_date(today);
    let before = records.len();

    let kept: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|r| r.data <= cutoff && !r.taxa.is_nan())
        .collect();

    debug!(kept = kept.len(), dropped = before - kept.len(), %cutoff, "filtered records");
    kept
}
