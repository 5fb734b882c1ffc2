// src/export.rs

use crate::process::series::Series;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use tracing::info;

/// Write the series as the published CSV artifact.
///
/// Column order is fixed (`data,data_ref,ano,mes,taxa`); dates are ISO and
/// rates keep the locale's decimal comma, matching the artifact downstream
/// consumers already read.
pub fn write_series_csv(series: &Series, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {:?}", path))?;

    writer
        .write_record(["data", "data_ref", "ano", "mes", "taxa"])
        .context("writing CSV header")?;

    for row in series.rows() {
        writer
            .write_record([
                row.data.format("%Y-%m-%d").to_string(),
                row.data_ref.clone(),
                row.ano.to_string(),
                row.mes.to_string(),
                decimal_comma(row.taxa),
            ])
            .with_context(|| format!("writing row {}", row.data_ref))?;
    }

    writer.flush().context("flushing CSV writer")?;
    info!(rows = series.len(), path = %path.display(), "wrote series CSV");
    Ok(())
}

/// Stamp the run time next to the artifact.
pub fn write_run_stamp(path: impl AsRef<Path>, now: DateTime<Local>) -> Result<()> {
    let path = path.as_ref();
    let stamp = format!("Data: {}", now.format("%Y-%m-%d %H:%M:%S"));
    fs::write(path, stamp).with_context(|| format!("writing run stamp {:?}", path))
}

fn decimal_comma(value: f64) -> String {
    value.to_string().replace('.', ",")
}
