//! Environment/runtime helpers
//!
//! Sanity checks run at startup before the database is opened.

use std::path::Path;

use tracing::{info, warn};

/// Extract the on-disk path of a SQLite URL, if any.
///
/// Returns `None` for in-memory databases and non-SQLite URLs.
pub fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" || path.starts_with("file::memory:") {
        return None;
    }
    Some(path)
}

/// Ensure the directory holding a file-backed SQLite database exists.
pub async fn ensure_env(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else { return Ok(()); };
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            if tokio::fs::metadata(dir).await.is_err() {
                warn!(dir = %dir.display(), "sqlite directory missing; creating it");
            }
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
        }
        _ => {}
    }
    info!(%path, "sqlite database file");
    Ok(())
}
