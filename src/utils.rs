//! Small helpers for date stamps, log-friendly strings and the output directory.
//!
//! - Date stamps (`YYYYMMDD`) used to prefix dated image filenames
//! - String truncation for error details that end up in log lines
//! - File system validation for the image directory

use chrono::NaiveDate;
use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Format a calendar date as the compact stamp used in dated filenames.
///
/// # Examples
///
/// ```ignore
/// let d = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
/// assert_eq!(date_stamp(d), "20250102");
/// ```
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (respecting char
/// boundaries) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory (and parents) if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created or
/// the probe file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;

    // A sync probe keeps the error surface simple
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    if let Err(e) = stdfs::remove_file(&probe_path) {
        warn!(probe = %probe_path.display(), error = %e, "Could not remove write probe");
    }
    info!("Output directory is writable");
    Ok(())
}
