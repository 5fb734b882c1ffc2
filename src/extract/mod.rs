// src/extract/mod.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Environment variable naming the tabula jar; defaults to `tabula.jar`.
static TABULA_JAR_ENV: &str = "TABULA_JAR";

/// One raw table as handed over by the PDF table extractor, before any
/// reconstruction.
///
/// The extractor treats the first row of every table it finds as that
/// table's header, so `columns` may hold ordinary year labels or, for a
/// block cut off by a page break, the first row of actual month data.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
    /// Column labels, exactly as the extractor reported them.
    pub columns: Vec<String>,
    /// Data rows, one cell per column.
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ExtractedTable {
    data: Vec<Vec<ExtractedCell>>,
}

#[derive(Deserialize)]
struct ExtractedCell {
    #[serde(default)]
    text: String,
}

/// Decode the extractor's JSON output into fragments, in document order.
///
/// The first row of each table becomes its column labels; remaining rows are
/// data. Rows narrower than the header are padded with empty cells so every
/// fragment is rectangular. Tables with no rows at all are skipped.
pub fn parse_extractor_json(raw: &[u8]) -> Result<Vec<RawFragment>> {
    let tables: Vec<ExtractedTable> =
        serde_json::from_slice(raw).context("decoding extractor JSON")?;

    let mut fragments = Vec::with_capacity(tables.len());
    for (n, table) in tables.into_iter().enumerate() {
        let mut rows = table
            .data
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.text).collect::<Vec<_>>());

        let Some(columns) = rows.next() else {
            warn!(table = n, "extractor returned an empty table; skipping");
            continue;
        };

        let width = columns.len();
        let rows: Vec<Vec<String>> = rows
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        debug!(table = n, rows = rows.len(), columns = width, "decoded fragment");
        fragments.push(RawFragment { columns, rows });
    }

    Ok(fragments)
}

/// Run the external extractor over `pdf_path` and decode its output.
///
/// Tabula is invoked in stream mode over all pages, matching how the source
/// document lays its tables out.
#[tracing::instrument(level = "info", skip(pdf_path), fields(pdf = %pdf_path.as_ref().display()))]
pub async fn extract_fragments(pdf_path: impl AsRef<Path>) -> Result<Vec<RawFragment>> {
    let jar = env::var(TABULA_JAR_ENV).unwrap_or_else(|_| "tabula.jar".to_string());

    let output = Command::new("java")
        .args(["-jar", &jar, "--pages", "all", "--stream", "--format", "JSON"])
        .arg(pdf_path.as_ref())
        .output()
        .await
        .with_context(|| format!("running tabula from {}", jar))?;

    if !output.status.success() {
        bail!(
            "tabula exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let fragments = parse_extractor_json(&output.stdout)?;
    info!(fragments = fragments.len(), "extraction complete");
    Ok(fragments)
}
