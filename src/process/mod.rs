// src/process/mod.rs

pub mod filter;
pub mod flatten;
pub mod normalize;
pub mod reassemble;
pub mod series;

use crate::error::TableResult;
use crate::extract::RawFragment;
use chrono::NaiveDate;
use series::Series;
use tracing::info;

/// Run the whole reconstruction over the extractor's fragments.
///
/// Reassemble → flatten → normalize → filter → finalize, each stage
/// consuming the full output of the one before. `today` anchors the
/// forward-date cutoff. The first fatal error aborts the run; no partial
/// series is ever returned.
#[tracing::instrument(level = "info", skip(fragments), fields(fragments = fragments.len()))]
pub fn build_series(fragments: &[RawFragment], today: NaiveDate) -> TableResult<Series> {
    let blocks = reassemble::reassemble(fragments)?;
    info!(blocks = blocks.len(), "reassembled table blocks");

    let long = flatten::flatten(&blocks);
    let normalized = normalize::normalize(&long)?;
    info!(
        cells = long.len(),
        records = normalized.len(),
        "normalized long records"
    );

    let kept = filter::filter_records(normalized, today);
    let series = series::finalize(kept);
    info!(rows = series.len(), "series finalized");

    Ok(series)
}
