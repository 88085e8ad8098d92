//! Removal of same-day images before a dated run.
//!
//! A file is stale when its name starts with today's `YYYYMMDD` stamp and
//! ends with `.jpg`. Directories and files from other days are never touched.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// True if `file_name` belongs to the day identified by `stamp`.
pub fn is_stale(file_name: &str, stamp: &str) -> bool {
    file_name.starts_with(stamp) && file_name.ends_with(".jpg")
}

/// Delete every stale file in `dir` and return the removed paths.
///
/// A missing directory is treated as empty.
///
/// # Errors
///
/// Fails on the first directory read or delete error.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %stamp))]
pub async fn remove_stale_files(dir: &Path, stamp: &str) -> io::Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut removed = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_stale(name, stamp) || !entry.file_type().await?.is_file() {
            continue;
        }

        let path = entry.path();
        fs::remove_file(&path).await?;
        debug!(path = %path.display(), "Removed stale image");
        removed.push(path);
    }

    removed.sort();
    info!(count = removed.len(), "Stale image cleanup finished");
    Ok(removed)
}
