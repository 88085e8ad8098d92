//! JSON run report.
//!
//! Scheduled jobs can read this file instead of scraping console output;
//! `status.kind` tells a completed run from one where the page was unavailable.

use crate::models::RunReport;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `report` as pretty JSON to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &RunReport, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, json).await?;
    info!(saved = report.saved, "Wrote run report");
    Ok(())
}
