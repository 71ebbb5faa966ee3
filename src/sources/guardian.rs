//! Guardian crossword page fetcher.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use url::Url;

use crate::config::HttpConfig;
use crate::sources::{FetchError, PageFetcher};
use crate::utils::{HttpClient, HttpClientError};

/// Fetches crossword pages from theguardian.com
///
/// The site serves pages to browsers only, so requests carry a desktop
/// browser User-Agent, Accept headers and a Referer of the crosswords index.
#[derive(Debug, Clone)]
pub struct GuardianFetcher {
    client: Arc<HttpClient>,
}

impl GuardianFetcher {
    pub fn new() -> Result<Self, HttpClientError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
        })
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, HttpClientError> {
        Ok(Self {
            client: Arc::new(HttpClient::from_config(config)?),
        })
    }
}

#[async_trait]
impl PageFetcher for GuardianFetcher {
    fn id(&self) -> &str {
        "guardian"
    }

    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!("Trying: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}
