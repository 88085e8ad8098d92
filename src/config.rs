//! Run settings: built-in defaults, an optional YAML file, then CLI overrides.
//!
//! # File format
//!
//! ```yaml
//! url: https://dhankesari.org/
//! output_dir: images
//! layout: dated        # or: plain
//! max_images: 3
//! max_retries: 3
//! timeout_secs: 10
//! retry_delay_secs: 2
//! publish: false
//! ```
//!
//! Every key is optional.

use crate::cli::Cli;
use crate::download::{MAX_RETRIES, RETRY_DELAY, RetryPolicy};
use crate::models::Layout;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Page scanned when no URL is configured.
pub const DEFAULT_URL: &str = "https://dhankesari.org/";
/// Directory images are written to when none is configured.
pub const DEFAULT_IMAGE_DIR: &str = "images";
/// Images saved per run.
pub const MAX_IMAGE_DOWNLOADS: usize = 3;
/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub url: String,
    pub output_dir: PathBuf,
    pub layout: Layout,
    pub max_images: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub retry_delay_secs: u64,
    pub publish: bool,
    pub repo_dir: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            layout: Layout::default(),
            max_images: MAX_IMAGE_DOWNLOADS,
            max_retries: MAX_RETRIES,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            retry_delay_secs: RETRY_DELAY.as_secs(),
            publish: false,
            repo_dir: None,
            report_json: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values given on the command line.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.url {
            self.url = url.clone();
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(layout) = cli.layout {
            self.layout = layout;
        }
        if let Some(n) = cli.max_images {
            self.max_images = n;
        }
        if let Some(n) = cli.max_retries {
            self.max_retries = n;
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(secs) = cli.retry_delay_secs {
            self.retry_delay_secs = secs;
        }
        self.publish |= cli.publish;
        if cli.repo_dir.is_some() {
            self.repo_dir = cli.repo_dir.clone();
        }
        if cli.report_json.is_some() {
            self.report_json = cli.report_json.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.url)
            .map_err(|e| ConfigError::Invalid(format!("url `{}`: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "url `{}` must use http or https",
                self.url
            )));
        }
        if self.max_images == 0 {
            return Err(ConfigError::Invalid("max_images must be at least 1".into()));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

/// Build the effective settings for this process.
#[instrument(level = "info", skip_all)]
pub fn resolve(cli: &Cli) -> Result<Settings, ConfigError> {
    let base = match &cli.config {
        Some(path) => Settings::from_yaml_file(path)?,
        None => Settings::default(),
    };
    let settings = base.apply_cli(cli);
    settings.validate()?;
    debug!(?settings, "Resolved settings");
    Ok(settings)
}
