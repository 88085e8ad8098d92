//! Image download with a flat, bounded retry loop.
//!
//! Each attempt runs the same steps: GET the URL, decode the body in memory
//! to prove it is a real image, then write the exact fetched bytes to disk.
//! Any failing step fails the attempt. Attempts are separated by a fixed
//! delay; there is no delay after the last one.

use crate::fetch::{FetchError, Fetcher};
use crate::models::SavedImage;
use crate::utils::truncate_for_log;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Default number of attempts per image.
pub const MAX_RETRIES: u32 = 3;
/// Default pause between attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid image data: {0}")]
    InvalidImage(#[from] image::ImageError),

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: RETRY_DELAY,
        }
    }
}

/// Decode `bytes` to check they form a structurally valid image.
///
/// The decoded pixels are discarded; only success matters.
pub fn validate_image(bytes: &[u8]) -> Result<(), image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    debug!(width = img.width(), height = img.height(), "Image decoded");
    Ok(())
}

/// One attempt: fetch, validate, persist. Returns the number of bytes written.
async fn download_once<F: Fetcher>(
    fetcher: &F,
    url: &str,
    path: &Path,
) -> Result<usize, DownloadError> {
    let body = fetcher.fetch_bytes(url).await?;
    validate_image(&body)?;
    fs::write(path, &body)
        .await
        .map_err(|source| DownloadError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(body.len())
}

/// Download `url` into `path`, trying up to `policy.max_retries` times.
///
/// `ordinal` is the number the image will carry if it is saved; it only
/// appears in log lines and the returned record.
///
/// # Errors
///
/// Returns the error of the final attempt once every attempt has failed.
/// Nothing is left on disk for a failed image unless a previous file with
/// the same name existed.
#[instrument(level = "info", skip_all, fields(%url, ordinal))]
pub async fn download_with_retry<F: Fetcher>(
    fetcher: &F,
    url: &str,
    path: &Path,
    ordinal: usize,
    policy: &RetryPolicy,
) -> Result<SavedImage, DownloadError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut attempt = 1;
    loop {
        match download_once(fetcher, url, path).await {
            Ok(bytes) => {
                info!(attempt, bytes, file = %file_name, "Image {ordinal} saved as {file_name} (attempt {attempt})");
                return Ok(SavedImage {
                    ordinal,
                    source: url.to_string(),
                    path: path.to_path_buf(),
                    attempt,
                    bytes,
                });
            }
            Err(e) => {
                let detail = truncate_for_log(&e.to_string(), 300);
                if attempt >= policy.max_retries {
                    error!(attempt, max = policy.max_retries, error = %detail, "Failed on attempt {attempt} for Image {ordinal}; giving up");
                    return Err(e);
                }
                warn!(attempt, max = policy.max_retries, delay = ?policy.delay, error = %detail, "Failed on attempt {attempt} for Image {ordinal}");
                attempt += 1;
                sleep(policy.delay).await;
            }
        }
    }
}
