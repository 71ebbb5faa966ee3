//! Puzzle extraction from publisher HTML.
//!
//! The publisher has embedded puzzle JSON in several different ways over the
//! years (web-component props, legacy data attributes, bare script objects),
//! with and without entity encoding. [`extract`] tries every known
//! [`Pattern`] in [`CASCADE`] order and returns the first payload that holds a
//! non-empty `entries` array.
//!
//! Extraction never fails loudly: malformed JSON or a payload without entries
//! only means that pattern did not match, and the next one is tried.
//!
//! ```rust
//! use crossword_fetch::extract::extract;
//!
//! let html = r#"<gu-island name="CrosswordComponent" props='{"data":{"id":"crosswords/quick/1","entries":[
//!     {"position":{"x":0,"y":0},"direction":"across","clue":"Cat (3)","length":3}]}}'></gu-island>"#;
//! let record = extract(html, "quick").unwrap();
//! assert_eq!(record.entries().len(), 1);
//! ```

mod entities;
mod patterns;

pub use entities::decode_html_entities;
pub use patterns::{Pattern, CASCADE};

use serde_json::Value;

use crate::models::{PuzzleRecord, RecordError};

/// A record together with the pattern that found it
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: PuzzleRecord,
    pub pattern: Pattern,
}

/// Why no record could be extracted from a page
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// No pattern located a payload
    #[error("Could not extract data from page")]
    NoPayload,

    /// A payload was found but its entries were empty
    #[error("No entries in puzzle data")]
    EmptyEntries,

    /// A payload was found but was not valid puzzle JSON
    #[error("Malformed puzzle data: {0}")]
    Malformed(String),
}

impl ExtractError {
    /// How much a miss tells us about the page; the most telling one is reported
    fn rank(&self) -> u8 {
        match self {
            ExtractError::NoPayload => 0,
            ExtractError::Malformed(_) => 1,
            ExtractError::EmptyEntries => 2,
        }
    }
}

/// Extract the puzzle record embedded in `html`
pub fn extract(html: &str, puzzle_type: &str) -> Result<PuzzleRecord, ExtractError> {
    extract_traced(html, puzzle_type).map(|extraction| extraction.record)
}

/// Extract the puzzle record embedded in `html`, reporting which pattern matched
pub fn extract_traced(html: &str, puzzle_type: &str) -> Result<Extraction, ExtractError> {
    let mut miss = ExtractError::NoPayload;

    for pattern in CASCADE {
        let Some(raw) = pattern.locate(html) else {
            continue;
        };

        match parse_payload(&raw) {
            Ok(record) => {
                tracing::debug!("Puzzle data found with pattern {}", pattern.name());
                if let Some(found) = record.crossword_type() {
                    if found != puzzle_type {
                        tracing::warn!(
                            "Requested a {} puzzle but the page holds a {} puzzle",
                            puzzle_type,
                            found
                        );
                    }
                }
                return Ok(Extraction { record, pattern });
            }
            Err(err) => {
                tracing::debug!("Pattern {} matched but was rejected: {}", pattern.name(), err);
                if err.rank() > miss.rank() {
                    miss = err;
                }
            }
        }
    }

    Err(miss)
}

fn parse_payload(raw: &str) -> Result<PuzzleRecord, ExtractError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ExtractError::Malformed(e.to_string()))?;

    PuzzleRecord::from_value(select_payload(value)).map_err(|err| match err {
        RecordError::NoEntries => ExtractError::EmptyEntries,
        RecordError::Invalid(e) => ExtractError::Malformed(e.to_string()),
    })
}

/// Pick the puzzle object out of a parsed payload.
///
/// Component props wrap the puzzle as `{"data": {...}}`; legacy attributes
/// and raw blobs hold it directly. Whichever has non-empty entries wins,
/// with the wrapped form preferred.
fn select_payload(value: Value) -> Value {
    let Value::Object(mut wrapper) = value else {
        return value;
    };

    let data_usable = wrapper.get("data").is_some_and(has_entries);
    let self_usable = has_entries(&Value::Object(wrapper.clone()));
    let data_has_key = wrapper
        .get("data")
        .is_some_and(|data| data.get("entries").is_some());

    if data_usable || (!self_usable && data_has_key) {
        if let Some(data) = wrapper.remove("data") {
            return data;
        }
    }

    Value::Object(wrapper)
}

fn has_entries(value: &Value) -> bool {
    value
        .get("entries")
        .and_then(Value::as_array)
        .is_some_and(|entries| !entries.is_empty())
}
