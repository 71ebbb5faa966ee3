//! # Crossword Fetch
//!
//! Locates and extracts Guardian crossword puzzles given a puzzle type and an
//! optional edition number.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (PuzzleType, EditionNumber, PuzzleRecord, ...)
//! - [`estimator`]: Today's edition number from a type's anchor and cadence
//! - [`extract`]: Cascade of markup patterns that pull puzzle JSON out of HTML
//! - [`retrieval`]: Bounded search over nearby editions
//! - [`sources`]: Page fetchers behind the [`PageFetcher`] trait
//! - [`service`]: Request normalization and the JSON output contract
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client
//!
//! ```rust,no_run
//! use crossword_fetch::config::Config;
//! use crossword_fetch::service::{PuzzleRequest, PuzzleService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = PuzzleService::from_config(&Config::default())?;
//! let response = service.handle(&PuzzleRequest::new(Some("quick"), None)).await;
//! println!("{}", response.body_text(true));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod estimator;
pub mod extract;
pub mod models;
pub mod retrieval;
pub mod service;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{EditionNumber, PuzzleRecord, PuzzleType};
pub use retrieval::{Retriever, SearchPolicy};
pub use sources::PageFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
