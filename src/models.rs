//! Data models for a single image-harvesting run.
//!
//! - [`ImageTag`]: an `<img>` element as found in the page, in document order
//! - [`Layout`]: how saved files are named and whether same-day files are replaced
//! - [`SavedImage`]: one image that passed validation and was written to disk
//! - [`RunReport`]: everything a run produced, returned instead of global counters

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An `<img>` element extracted from the page.
///
/// `src` is kept exactly as written in the markup; normalization happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub src: Option<String>,
}

/// Output naming scheme.
///
/// * `Dated` - `<YYYYMMDD>_img<N>.jpg`; files carrying today's stamp are
///   removed before the run so a rerun replaces them.
/// * `Plain` - `img<N>.jpg`; nothing is cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Dated,
    Plain,
}

impl Layout {
    /// Filename for the image with the given 1-based ordinal.
    pub fn file_name(&self, stamp: &str, ordinal: usize) -> String {
        match self {
            Layout::Dated => format!("{stamp}_img{ordinal}.jpg"),
            Layout::Plain => format!("img{ordinal}.jpg"),
        }
    }

    /// Whether same-day files are removed before downloading.
    pub fn cleans_stale(&self) -> bool {
        matches!(self, Layout::Dated)
    }
}

/// An image that was downloaded, validated, and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedImage {
    /// 1-based position among successful saves in this run.
    pub ordinal: usize,
    /// The normalized URL the bytes came from.
    pub source: String,
    pub path: PathBuf,
    /// Attempt that succeeded (1-based).
    pub attempt: u32,
    pub bytes: usize,
}

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    /// The page was fetched and every candidate was processed (possibly saving nothing).
    Completed,
    /// The page could not be fetched; no image work was done.
    PageUnavailable { reason: String },
}

/// Result record of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub layout: Layout,
    pub date_stamp: String,
    pub output_dir: PathBuf,
    /// Number of images saved this run.
    pub saved: usize,
    pub files: Vec<SavedImage>,
    /// True if stale same-day files were removed before downloading.
    pub cleaned: bool,
    /// URLs that exhausted every attempt.
    pub skipped: Vec<String>,
    /// `None` when publishing was not attempted.
    pub published: Option<bool>,
}

impl RunReport {
    pub fn new(layout: Layout, date_stamp: impl Into<String>, output_dir: &Path) -> Self {
        Self {
            status: RunStatus::Completed,
            layout,
            date_stamp: date_stamp.into(),
            output_dir: output_dir.to_path_buf(),
            saved: 0,
            files: Vec::new(),
            cleaned: false,
            skipped: Vec::new(),
            published: None,
        }
    }

    /// Record a successful save and keep `saved` in step with `files`.
    pub fn record_saved(&mut self, image: SavedImage) {
        self.files.push(image);
        self.saved = self.files.len();
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn is_page_unavailable(&self) -> bool {
        matches!(self.status, RunStatus::PageUnavailable { .. })
    }
}
