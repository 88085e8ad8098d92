//! Page scraping: turning fetched markup into candidate image URLs.
//!
//! The scraper follows a two-step pattern:
//!
//! 1. **Extraction**: every `<img>` element, in document order ([`images::extract_image_tags`])
//! 2. **Selection**: keep `.jpg` sources and make them absolute ([`images::candidate_url`])
//!
//! Parsing uses `scraper` (html5ever), which recovers from malformed markup
//! the way browsers do instead of failing.

pub mod images;
