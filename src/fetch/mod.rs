//! HTTP access behind a small trait so the pipeline can run against a fake network.
//!
//! - [`Fetcher`]: GET a URL as text (the page) or bytes (an image)
//! - [`HttpFetcher`]: `reqwest` client with a per-request timeout
//! - `MockFetcher` (tests only): scripted responses keyed by URL

mod http;

#[cfg(test)]
mod mock;

use thiserror::Error;

pub use http::HttpFetcher;

#[cfg(test)]
pub use mock::{MockFetcher, MockResponse};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Transport failure not tied to a `reqwest` error (used by fakes).
    #[cfg_attr(not(test), allow(dead_code))]
    #[error("network error: {0}")]
    Network(String),
}

/// GET operations used by the pipeline.
///
/// Implementations must treat any non-2xx status as an error.
pub trait Fetcher {
    /// GET `url` and return the body decoded as text.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET `url` and return the raw body.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
