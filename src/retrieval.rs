//! Retrieval orchestration.
//!
//! [`Retriever`] ties the pieces together: it picks a starting edition (the
//! caller's, or the estimator's guess for today), then walks the candidates
//! from [`SearchPolicy`] one at a time, fetching and extracting each page
//! until one yields a puzzle. Estimates tend to be exact or slightly ahead of
//! what is published, so by default the walk goes backwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::estimator::{today_utc, Estimate};
use crate::extract::{extract, ExtractError};
use crate::models::{
    AttemptOutcome, EditionNumber, PuzzleRecord, RetrievalAttempt, RetrievedPuzzle,
};
use crate::sources::{page_url, FetchError, PageFetcher};

/// Page URL prefix used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://www.theguardian.com/crosswords";

/// Which way to step from the starting edition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// start, start-1, start-2, ...
    #[default]
    Descending,
    /// start, start+1, start+2, ...
    Ascending,
}

/// How many editions to try, and in which direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Maximum number of candidate editions, the starting one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub direction: SearchDirection,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            direction: SearchDirection::default(),
        }
    }
}

fn default_max_attempts() -> u32 {
    8
}

impl SearchPolicy {
    /// Candidate editions in the order they are tried.
    ///
    /// Always includes `start`, even when `max_attempts` is 0. Stops early
    /// rather than going below edition 1.
    pub fn candidates(&self, start: EditionNumber) -> impl Iterator<Item = EditionNumber> + '_ {
        (0..self.max_attempts.max(1)).map_while(move |step| match self.direction {
            SearchDirection::Descending => start.checked_back(step),
            SearchDirection::Ascending => start.checked_forward(step),
        })
    }
}

/// Errors from a retrieval
#[derive(Debug, Clone, thiserror::Error)]
pub enum RetrievalError {
    /// Every candidate edition failed
    #[error(
        "Could not find a valid {} puzzle. Tried: {}. Last error: {}",
        .puzzle_type,
        join_numbers(.tried),
        .last_error.as_deref().unwrap_or("unknown")
    )]
    Exhausted {
        puzzle_type: String,
        tried: Vec<EditionNumber>,
        last_error: Option<String>,
        attempts: Vec<RetrievalAttempt>,
    },
}

fn join_numbers(numbers: &[EditionNumber]) -> String {
    numbers
        .iter()
        .map(EditionNumber::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Finds the most recent published puzzle of a type
#[derive(Clone)]
pub struct Retriever {
    fetcher: Arc<dyn PageFetcher>,
    estimator: Arc<dyn Estimate>,
    policy: SearchPolicy,
    base_url: String,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("fetcher", &self.fetcher.id())
            .field("policy", &self.policy)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Retriever {
    pub fn new(fetcher: Arc<dyn PageFetcher>, estimator: Arc<dyn Estimate>) -> Self {
        Self {
            fetcher,
            estimator,
            policy: SearchPolicy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Retrieve a puzzle, estimating the edition from today's UTC date when
    /// `explicit` is `None`
    pub async fn retrieve(
        &self,
        puzzle_type: &str,
        explicit: Option<EditionNumber>,
    ) -> Result<RetrievedPuzzle, RetrievalError> {
        self.retrieve_on(puzzle_type, explicit, today_utc()).await
    }

    /// Retrieve a puzzle as if today were `today`
    pub async fn retrieve_on(
        &self,
        puzzle_type: &str,
        explicit: Option<EditionNumber>,
        today: NaiveDate,
    ) -> Result<RetrievedPuzzle, RetrievalError> {
        let start = match explicit {
            Some(number) => number,
            None => {
                let estimate = self.estimator.estimate(puzzle_type, today);
                tracing::debug!("Estimated {} puzzle for {}: {}", puzzle_type, today, estimate);
                estimate
            }
        };

        let mut attempts: Vec<RetrievalAttempt> = Vec::new();

        for number in self.policy.candidates(start) {
            match self.attempt(puzzle_type, number).await {
                Ok(record) => {
                    tracing::info!("Found {} puzzle {}", puzzle_type, number);
                    attempts.push(RetrievalAttempt::new(number, AttemptOutcome::Success));
                    return Ok(RetrievedPuzzle {
                        record,
                        number,
                        attempts,
                    });
                }
                Err(outcome) => {
                    tracing::debug!("{} puzzle {}: {}", puzzle_type, number, outcome);
                    attempts.push(RetrievalAttempt::new(number, outcome));
                }
            }
        }

        let last_error = attempts.iter().rev().find_map(RetrievalAttempt::error_text);
        let tried = attempts.iter().map(|attempt| attempt.number).collect();

        Err(RetrievalError::Exhausted {
            puzzle_type: puzzle_type.to_string(),
            tried,
            last_error,
            attempts,
        })
    }

    /// Fetch and extract one candidate edition
    async fn attempt(
        &self,
        puzzle_type: &str,
        number: EditionNumber,
    ) -> Result<PuzzleRecord, AttemptOutcome> {
        let url = page_url(&self.base_url, puzzle_type, number)
            .map_err(|e| AttemptOutcome::TransportError(e.to_string()))?;

        tracing::info!("Trying: {}", url);

        let html = self.fetcher.fetch(&url).await.map_err(|err| match err {
            FetchError::NotFound => AttemptOutcome::NotFound,
            other => {
                tracing::warn!("Fetching {} failed: {}", url, other);
                AttemptOutcome::TransportError(other.to_string())
            }
        })?;

        extract(&html, puzzle_type).map_err(|err| match err {
            ExtractError::Malformed(_) => AttemptOutcome::ParseError(err.to_string()),
            ExtractError::NoPayload | ExtractError::EmptyEntries => {
                AttemptOutcome::ExtractionEmpty(err.to_string())
            }
        })
    }
}
