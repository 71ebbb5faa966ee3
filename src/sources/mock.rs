//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use crate::models::EditionNumber;
use crate::sources::{page_key, FetchError, PageFetcher};

/// A scripted response for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Page(String),
    NotFound,
    Status(u16),
    Network(String),
}

impl MockResponse {
    fn into_result(self) -> Result<String, FetchError> {
        match self {
            MockResponse::Page(html) => Ok(html),
            MockResponse::NotFound => Err(FetchError::NotFound),
            MockResponse::Status(code) => Err(FetchError::Status(code)),
            MockResponse::Network(msg) => Err(FetchError::Network(msg)),
        }
    }
}

/// A mock fetcher that serves predefined pages, keyed by (type, number).
///
/// Pages without a scripted response are reported as not found. Every
/// requested URL is recorded in order.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<(String, u32), MockResponse>>,
    requests: Mutex<Vec<Url>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for a page.
    pub fn respond(&self, puzzle_type: &str, number: u32, response: MockResponse) {
        let mut guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert((puzzle_type.to_string(), number), response);
    }

    /// Builder-style [`respond`](Self::respond).
    pub fn with_response(self, puzzle_type: &str, number: u32, response: MockResponse) -> Self {
        self.respond(puzzle_type, number, response);
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Edition numbers requested so far, in order.
    pub fn requested_numbers(&self) -> Vec<EditionNumber> {
        self.requests()
            .iter()
            .filter_map(page_key)
            .filter_map(|(_, number)| EditionNumber::new(number))
            .collect()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.clone());

        let Some(key) = page_key(url) else {
            return Err(FetchError::NotFound);
        };

        let guard = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(&key)
            .cloned()
            .unwrap_or(MockResponse::NotFound)
            .into_result()
    }
}
