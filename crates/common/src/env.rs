//! Environment/runtime helpers
//!
//! Sanity checks to ensure the on-disk store location exists at startup.

use std::path::Path;

use tracing::{info, warn};

/// Extract the filesystem path from a `sqlite:` URL, if it names a file.
///
/// Returns `None` for in-memory databases.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}

/// Ensure the parent directory of a file-backed SQLite store exists.
pub async fn ensure_store_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        warn!(%database_url, "database is in-memory; records will not survive a restart");
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    info!(store = %path, "store location ready");
    Ok(())
}
