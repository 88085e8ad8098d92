//! Command-line interface definitions.
//!
//! Every option is optional: running the binary with no arguments scans
//! `https://dhankesari.org/` and writes dated images to `./images`. Values
//! given here override the YAML settings file, which overrides built-in
//! defaults (see [`crate::config`]).

use crate::models::Layout;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: dated layout, 3 images, same-day files replaced
/// front_page_images
///
/// # Plain names, then commit and push the image folder
/// front_page_images --layout plain --publish
///
/// # Another page, with a JSON report of the run
/// front_page_images --url https://example.com/ -o ./out --report-json ./out/run.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page to scan for `<img>` tags
    #[arg(long, env = "PAGE_URL")]
    pub url: Option<String>,

    /// Directory the images are written to
    #[arg(short, long, env = "IMAGE_DIR")]
    pub output_dir: Option<PathBuf>,

    /// File naming: `dated` replaces today's files, `plain` uses img<N>.jpg
    #[arg(long, value_enum, env = "IMAGE_LAYOUT")]
    pub layout: Option<Layout>,

    /// Maximum number of images saved per run
    #[arg(long)]
    pub max_images: Option<usize>,

    /// Attempts per image before it is skipped
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Timeout for each HTTP request, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Pause between attempts, in seconds
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,

    /// Commit and push the image directory with git after a run that saved images
    #[arg(long, env = "PUBLISH_IMAGES")]
    pub publish: bool,

    /// Repository to run git in (defaults to the current directory)
    #[arg(long)]
    pub repo_dir: Option<PathBuf>,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}
