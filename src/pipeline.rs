//! The fetch-parse-download-save-publish pipeline.
//!
//! ## Steps
//!
//! 1. Ensure the output directory exists and is writable
//! 2. Dated layout only: remove images carrying today's stamp
//! 3. Fetch the page; if that fails, stop with [`RunStatus::PageUnavailable`]
//! 4. Extract `<img>` tags in document order
//! 5. For each `.jpg` candidate, download with bounded retry until `max_images` are saved
//! 6. If anything was saved and publishing is enabled, publish the image directory
//!
//! Per-image and publish failures never fail the run: a partial run is a
//! normal outcome. Only an unusable output directory is an error.

use crate::cleanup::remove_stale_files;
use crate::config::Settings;
use crate::download::download_with_retry;
use crate::fetch::Fetcher;
use crate::models::{RunReport, RunStatus};
use crate::publish::{Publisher, commit_message, publish_paths};
use crate::scrapers::images::{candidate_url, extract_image_tags};
use crate::utils::{date_stamp, ensure_writable_dir, truncate_for_log};
use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("output directory {} is not usable: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("failed to remove stale images in {}: {source}", path.display())]
    Cleanup { path: PathBuf, source: io::Error },
}

/// Run the pipeline once for `today`.
///
/// All state lives in the returned [`RunReport`]; nothing is global.
#[instrument(level = "info", skip_all, fields(url = %settings.url, dir = %settings.output_dir.display(), %today))]
pub async fn run<F, P>(
    settings: &Settings,
    fetcher: &F,
    publisher: &P,
    today: NaiveDate,
) -> Result<RunReport, RunError>
where
    F: Fetcher,
    P: Publisher,
{
    let stamp = date_stamp(today);
    let dir = &settings.output_dir;
    let mut report = RunReport::new(settings.layout, stamp.clone(), dir);

    ensure_writable_dir(dir)
        .await
        .map_err(|source| RunError::OutputDir {
            path: dir.clone(),
            source,
        })?;

    if settings.layout.cleans_stale() {
        let removed = remove_stale_files(dir, &stamp)
            .await
            .map_err(|source| RunError::Cleanup {
                path: dir.clone(),
                source,
            })?;
        report.cleaned = !removed.is_empty();
        if report.cleaned {
            info!(count = removed.len(), %stamp, "Removed previous images for today");
        }
    }

    let html = match fetcher.fetch_text(&settings.url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Failed to fetch page; no images will be downloaded");
            report.status = RunStatus::PageUnavailable {
                reason: truncate_for_log(&e.to_string(), 300),
            };
            return Ok(report);
        }
    };

    let tags = extract_image_tags(&html);
    info!(count = tags.len(), "Found img tags");

    let policy = settings.retry_policy();
    for tag in &tags {
        if report.saved >= settings.max_images {
            debug!(max = settings.max_images, "Reached image limit");
            break;
        }

        let Some(url) = candidate_url(tag, &settings.url) else {
            debug!(src = ?tag.src, "Skipping non-JPEG img tag");
            continue;
        };

        let ordinal = report.saved + 1;
        let path = dir.join(settings.layout.file_name(&stamp, ordinal));
        match download_with_retry(fetcher, &url, &path, ordinal, &policy).await {
            Ok(saved) => report.record_saved(saved),
            Err(e) => {
                warn!(%url, attempts = policy.max_retries, error = %e, "Skipping image");
                report.skipped.push(url);
            }
        }
    }

    if report.saved > 0 && publisher.is_enabled() {
        let message = commit_message(report.saved);
        match publisher.publish(&publish_paths(dir), &message).await {
            Ok(()) => {
                info!(count = report.saved, "{} images committed and pushed to repo", report.saved);
                report.published = Some(true);
            }
            Err(e) => {
                error!(error = %e, "Publishing images failed; saved files are kept");
                report.published = Some(false);
            }
        }
    }

    Ok(report)
}
