//! # Front Page Images
//!
//! Fetches a news front page, keeps the first few JPEG images it references,
//! and writes them to a local folder. Optionally commits and pushes the folder
//! with git.
//!
//! ## Usage
//!
//! ```sh
//! front_page_images                          # dated files in ./images
//! front_page_images --layout plain --publish # img<N>.jpg, then git add/commit/push
//! ```
//!
//! ## Architecture
//!
//! A single linear pipeline (see [`pipeline`]):
//! 1. **Prepare**: ensure the image folder, drop today's previous images (dated layout)
//! 2. **Scrape**: fetch the page and list its `<img>` tags in order
//! 3. **Download**: fetch, validate and save `.jpg` candidates with bounded retry
//! 4. **Publish**: commit and push when enabled and something was saved
//! 5. **Report**: summary line, optional JSON report, exit code
//!
//! ## Exit codes
//!
//! - `0`: the run completed (including partial runs and runs that saved nothing)
//! - `1`: setup failed (bad settings, unusable output directory)
//! - `2`: the page could not be fetched; nothing was downloaded

use chrono::Local;
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cleanup;
mod cli;
mod config;
mod download;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod publish;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use outputs::{json, summary};
use publish::{GitPublisher, NoopPublisher};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("front_page_images starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = match config::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid settings");
            return Err(e.into());
        }
    };
    info!(
        url = %settings.url,
        dir = %settings.output_dir.display(),
        layout = ?settings.layout,
        max_images = settings.max_images,
        publish = settings.publish,
        "Settings loaded"
    );

    let fetcher = HttpFetcher::new(settings.timeout())?;
    let today = Local::now().date_naive();

    let result = if settings.publish {
        let publisher = GitPublisher::new(settings.repo_dir.clone());
        pipeline::run(&settings, &fetcher, &publisher, today).await
    } else {
        pipeline::run(&settings, &fetcher, &NoopPublisher, today).await
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Run aborted");
            return Err(e.into());
        }
    };

    println!("{}", summary::summary_line(&report));
    info!(
        saved = report.saved,
        skipped = report.skipped.len(),
        cleaned = report.cleaned,
        files = %report.paths().iter().map(|p| p.display()).join(", "),
        "Run finished"
    );

    if let Some(path) = &settings.report_json {
        if let Err(e) = json::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed to write run report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(summary::exit_code(&report))
}
