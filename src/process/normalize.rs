// src/process/normalize.rs

use crate::error::{TableError, TableResult};
use crate::process::flatten::LongRecord;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

/// Month abbreviations as printed in the source document.
static MONTH_NUMBERS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("JAN", 1),
        ("FEV", 2),
        ("MAR", 3),
        ("ABR", 4),
        ("MAI", 5),
        ("JUN", 6),
        ("JUL", 7),
        ("AGO", 8),
        ("SET", 9),
        ("OUT", 10),
        ("NOV", 11),
        ("DEZ", 12),
    ])
});

/// A fully parsed (month, year) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// First calendar day of (ano, mes).
    pub data: NaiveDate,
    /// "YYYY-MM" of `data`.
    pub data_ref: String,
    pub ano: i32,
    /// 1–12.
    pub mes: u32,
    pub taxa: f64,
    /// The rate cell as originally encoded.
    pub taxa_string: String,
}

/// Map a document month label to its month number.
pub fn month_number(label: &str) -> TableResult<u32> {
    MONTH_NUMBERS
        .get(label.trim())
        .copied()
        .ok_or_else(|| TableError::LabelParse(format!("unknown month label {label:?}")))
}

/// Parse a year label, tolerating stray whitespace anywhere in it.
pub fn parse_year(label: &str) -> TableResult<i32> {
    let cleaned: String = label.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned
        .parse()
        .map_err(|_| TableError::LabelParse(format!("unparsable year label {label:?}")))
}

/// Parse a rate cell in the document's numeral format.
///
/// Hyphens and periods are grouping marks and are stripped; the decimal
/// comma becomes a decimal point. `Ok(None)` means the cell is empty after
/// cleanup — no rate was published for that month, which is a legitimate
/// state, not corruption.
pub fn parse_rate(raw: &str) -> TableResult<Option<f64>> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    cleaned
        .parse()
        .map(Some)
        .map_err(|_| TableError::ValueParse(format!("unparsable rate {raw:?}")))
}

/// Parse every long record, dropping the ones with no published rate.
///
/// Month and year are structural identity; failing to parse either aborts
/// the run. Records are independent — no cross-record state.
pub fn normalize(records: &[LongRecord]) -> TableResult<Vec<NormalizedRecord>> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let mes = month_number(&record.mes)?;
        let ano = parse_year(&record.ano)?;

        let taxa = match parse_rate(&record.taxa)? {
            Some(value) => value,
            None => {
                trace!(mes, ano, "no published rate; dropping record");
                continue;
            }
        };

        let data = NaiveDate::from_ymd_opt(ano, mes, 1).ok_or_else(|| {
            TableError::LabelParse(format!("{ano}-{mes:02} is not a calendar month"))
        })?;

        out.push(NormalizedRecord {
            data,
            data_ref: data.format("%Y-%m").to_string(),
            ano,
            mes,
            taxa,
            taxa_string: record.taxa.clone(),
        });
    }
    Ok(out)
}
