//! Page fetchers.
//!
//! The retrieval loop never talks HTTP directly; it goes through the
//! [`PageFetcher`] trait. [`GuardianFetcher`] fetches real pages with reqwest,
//! [`MockFetcher`] serves scripted responses for tests.
//!
//! # Implementing a New Fetcher
//!
//! 1. Create a struct that implements `PageFetcher`
//! 2. Map "page does not exist" to [`FetchError::NotFound`] so the search
//!    moves on quietly; every other failure is reported to the caller
//! 3. Hand it to [`Retriever::new`](crate::retrieval::Retriever::new)

mod guardian;
pub mod mock;

pub use guardian::GuardianFetcher;
pub use mock::{MockFetcher, MockResponse};

use async_trait::async_trait;
use url::Url;

use crate::models::EditionNumber;

/// Fetches the raw HTML of a puzzle page
#[async_trait]
pub trait PageFetcher: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Fetch the page at `url`
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Errors that can occur when fetching a page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The page does not exist (HTTP 404)
    #[error("Page not found")]
    NotFound,

    /// Any other unsuccessful HTTP status
    #[error("HTTP {0}")]
    Status(u16),

    /// Network or connection error
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be read
    #[error("Failed to read page: {0}")]
    Body(String),

    /// The page URL could not be built
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),
}

/// URL of a puzzle page: `{base_url}/{puzzle_type}/{number}`
pub fn page_url(base_url: &str, puzzle_type: &str, number: EditionNumber) -> Result<Url, FetchError> {
    let raw = format!("{}/{}/{}", base_url.trim_end_matches('/'), puzzle_type, number);
    Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// The (type, number) a page URL points at, read from its last two path segments
pub fn page_key(url: &Url) -> Option<(String, u32)> {
    let mut segments = url.path_segments()?.rev().filter(|s| !s.is_empty());
    let number = segments.next()?.parse().ok()?;
    let puzzle_type = segments.next()?.to_string();
    Some((puzzle_type, number))
}
