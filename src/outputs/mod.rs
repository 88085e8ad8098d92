//! Run output: the console summary and the optional JSON report.
//!
//! # Submodules
//!
//! - [`summary`]: the one-line human-readable outcome of a run
//! - [`json`]: writes the [`RunReport`](crate::models::RunReport) to disk
//!
//! # Image directory
//!
//! ```text
//! images/
//! ├── 20250102_img1.jpg   # dated layout
//! ├── 20250102_img2.jpg
//! ├── 20250102_img3.jpg
//! └── img1.jpg            # plain layout
//! ```

pub mod json;
pub mod summary;
