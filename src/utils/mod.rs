//! Utility modules.
//!
//! - [`HttpClient`]: reqwest client preconfigured with browser-like headers
//!   and timeouts from [`HttpConfig`](crate::config::HttpConfig)

mod http;

pub use http::{HttpClient, HttpClientError};
