use anyhow::Result;
use chrono::Local;
use reqwest::Client;
use std::fs;
use std::path::PathBuf;
use tjspscraper::{export, extract, fetch, process};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tjspscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let cache_dir = PathBuf::from("cache");
    let data_dir = PathBuf::from("data");
    for dir in [&cache_dir, &data_dir] {
        fs::create_dir_all(dir)?;
    }

    // ─── 3) fetch the table PDF ──────────────────────────────────────
    let client = Client::new();
    let pdf_path = fetch::download_table_pdf(&client, &cache_dir).await?;

    // ─── 4) run the external extractor ───────────────────────────────
    let fragments = extract::extract_fragments(&pdf_path).await?;
    info!(fragments = fragments.len(), "fragments extracted");

    // ─── 5) rebuild the series ───────────────────────────────────────
    let now = Local::now();
    let series = process::build_series(&fragments, now.date_naive())?;

    // ─── 6) export ───────────────────────────────────────────────────
    export::write_series_csv(&series, data_dir.join("tabela_debitos_judiciais.csv"))?;
    export::write_run_stamp(data_dir.join("date.txt"), now)?;

    info!(rows = series.len(), "all done");
    Ok(())
}
