// src/fetch.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// FileFetch endpoint publishing the judicial debt table PDF.
static TABLE_URL: &str = "https://api.tjsp.jus.br/Handlers/Handler/FileFetch.ashx?codigo=177683";

/// Filename the PDF is cached under inside `cache_dir`.
static TABLE_PDF: &str = "tabela_debitos_judiciais.pdf";

/// Download the table PDF into `cache_dir` and return its path.
///
/// A file already present in the cache is reused as-is; the endpoint serves
/// one rolling document, so delete the cache to force a refresh.
pub async fn download_table_pdf(client: &Client, cache_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let cache_dir = cache_dir.as_ref();
    let dest = cache_dir.join(TABLE_PDF);

    if fs::try_exists(&dest)
        .await
        .with_context(|| format!("checking cache at {:?}", dest))?
    {
        info!(path = %dest.display(), "using cached table PDF");
        return Ok(dest);
    }

    fs::create_dir_all(cache_dir)
        .await
        .with_context(|| format!("creating cache directory {:?}", cache_dir))?;

    let resp = client
        .get(TABLE_URL)
        .send()
        .await
        .context("requesting table PDF")?
        .error_for_status()
        .context("table PDF request rejected")?;
    let bytes = resp.bytes().await.context("reading table PDF body")?;

    fs::write(&dest, &bytes)
        .await
        .with_context(|| format!("writing {:?}", dest))?;
    info!(bytes = bytes.len(), path = %dest.display(), "downloaded table PDF");

    Ok(dest)
}
