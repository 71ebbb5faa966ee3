//! HTTP client utilities.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{redirect, Client};
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;

/// Shared HTTP client that presents itself like a desktop browser
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, HttpClientError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create a client with the configured user agent, headers and timeouts
    pub fn from_config(config: &HttpConfig) -> Result<Self, HttpClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("Accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("Accept-Language", &config.accept_language)?,
        );
        headers.insert(REFERER, header_value("Referer", &config.referer)?);

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(redirect::Policy::limited(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a GET request
    pub fn get(&self, url: impl reqwest::IntoUrl) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, HttpClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| HttpClientError::InvalidHeader(name.to_string(), value.to_string()))
}

/// Errors building the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Invalid {0} header value: {1:?}")]
    InvalidHeader(String, String),

    #[error("Failed to create HTTP client: {0}")]
    Build(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_client_rejects_bad_header() {
        let config = HttpConfig {
            referer: "bad\nvalue".to_string(),
            ..HttpConfig::default()
        };
        let err = HttpClient::from_config(&config).unwrap_err();
        assert!(matches!(err, HttpClientError::InvalidHeader(name, _) if name == "Referer"));
    }
}
