// src/process/series.rs

use crate::error::{TableError, TableResult};
use crate::process::normalize::NormalizedRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One row of the published series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub data: NaiveDate,
    pub data_ref: String,
    pub ano: i32,
    pub mes: u32,
    pub taxa: f64,
}

/// The reconstructed monthly rate series, ascending by date and densely
/// indexed by position.
#[derive(Debug, Clone, Default)]
pub struct Series {
    rows: Vec<SeriesRow>,
}

/// Project the surviving records onto the output schema.
///
/// The sort is stable, so rows sharing a date (possible only on malformed
/// input, which upstream does not deduplicate) keep their arrival order.
pub fn finalize(records: Vec<NormalizedRecord>) -> Series {
    let mut rows: Vec<SeriesRow> = records
        .into_iter()
        .map(|r| SeriesRow {
            data: r.data,
            data_ref: r.data_ref,
            ano: r.ano,
            mes: r.mes,
            taxa: r.taxa,
        })
        .collect();
    rows.sort_by_key(|row| row.data);
    Series { rows }
}

/// Target of a point lookup: an ISO date string or an already-parsed date.
#[derive(Debug, Clone)]
pub enum DateArg {
    Text(String),
    Day(NaiveDate),
}

impl From<&str> for DateArg {
    fn from(s: &str) -> Self {
        DateArg::Text(s.to_string())
    }
}

impl From<String> for DateArg {
    fn from(s: String) -> Self {
        DateArg::Text(s)
    }
}

impl From<NaiveDate> for DateArg {
    fn from(d: NaiveDate) -> Self {
        DateArg::Day(d)
    }
}

impl Series {
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rate row applicable to `date`: the first row in ascending date order
    /// whose month matches and whose year is at or after the target's.
    pub fn value_for_date(&self, date: impl Into<DateArg>) -> TableResult<&SeriesRow> {
        let target = match date.into() {
            DateArg::Day(day) => day,
            DateArg::Text(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| {
                TableError::QueryInput(format!("expected an YYYY-MM-DD date, got {text:?}"))
            })?,
        };

        self.rows
            .iter()
            .find(|row| row.mes == target.month() && row.ano >= target.year())
            .ok_or_else(|| {
                TableError::QueryNotFound(format!(
                    "no rate for month {:02} at or after {}",
                    target.month(),
                    target.year()
                ))
            })
    }
}
