//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the storage data directory exists and is writable.
pub async fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    let meta = tokio::fs::metadata(data_dir).await?;
    if meta.permissions().readonly() {
        return Err(anyhow::anyhow!("{data_dir} is read-only"));
    }
    info!(%data_dir, "data directory ready");
    Ok(())
}
