//! Retrieval bookkeeping: attempts made and the successful result.

use serde::Serialize;
use std::fmt;

use super::{EditionNumber, PuzzleRecord};

/// How a single candidate edition turned out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The page yielded a valid record
    Success,
    /// The page does not exist (not published yet, or never)
    NotFound,
    /// The page could not be fetched
    TransportError(String),
    /// A puzzle payload was found but could not be parsed
    ParseError(String),
    /// The page held no usable puzzle data
    ExtractionEmpty(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }

    /// Error text worth reporting, if the outcome carries any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AttemptOutcome::Success | AttemptOutcome::NotFound => None,
            AttemptOutcome::TransportError(msg)
            | AttemptOutcome::ParseError(msg)
            | AttemptOutcome::ExtractionEmpty(msg) => Some(msg),
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "success"),
            AttemptOutcome::NotFound => write!(f, "not found"),
            AttemptOutcome::TransportError(msg) => write!(f, "transport error: {}", msg),
            AttemptOutcome::ParseError(msg) => write!(f, "parse error: {}", msg),
            AttemptOutcome::ExtractionEmpty(msg) => write!(f, "extraction empty: {}", msg),
        }
    }
}

/// One candidate edition that was tried
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalAttempt {
    pub number: EditionNumber,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl RetrievalAttempt {
    pub fn new(number: EditionNumber, outcome: AttemptOutcome) -> Self {
        Self { number, outcome }
    }

    /// Error text prefixed with the edition, e.g. "Puzzle 17405: HTTP 500"
    pub fn error_text(&self) -> Option<String> {
        self.outcome
            .error_message()
            .map(|msg| format!("Puzzle {}: {}", self.number, msg))
    }
}

/// A successfully retrieved puzzle
#[derive(Debug, Clone)]
pub struct RetrievedPuzzle {
    pub record: PuzzleRecord,
    /// Edition the record was found at
    pub number: EditionNumber,
    /// Every attempt made, the successful one last
    pub attempts: Vec<RetrievalAttempt>,
}
