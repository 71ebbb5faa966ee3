//! Puzzle record model: the structured crossword extracted from a page.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Grid cell where an entry starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Direction an entry runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Parse the publisher's lowercase direction name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// One clue of the puzzle, kept exactly as published.
///
/// The accessors read the commonly used fields and return `None` when a
/// field is absent or has an unexpected shape; nothing is validated or
/// rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Value);

impl Entry {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn clue(&self) -> Option<&str> {
        self.0.get("clue").and_then(Value::as_str)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.0
            .get("direction")
            .and_then(Value::as_str)
            .and_then(Direction::from_name)
    }

    pub fn position(&self) -> Option<Position> {
        let position = self.0.get("position")?;
        Some(Position {
            x: position.get("x").and_then(Value::as_i64)?,
            y: position.get("y").and_then(Value::as_i64)?,
        })
    }

    /// Answer length in cells
    pub fn length(&self) -> Option<u64> {
        self.0.get("length").and_then(Value::as_u64)
    }
}

/// A crossword puzzle as published.
///
/// Always holds at least one entry; every other top-level field of the
/// publisher's payload is passed through in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleRecord {
    entries: Vec<Entry>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    entries: Vec<Entry>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl PuzzleRecord {
    /// Build a record, enforcing the non-empty entries invariant
    pub fn new(entries: Vec<Entry>, metadata: Map<String, Value>) -> Result<Self, RecordError> {
        if entries.is_empty() {
            return Err(RecordError::NoEntries);
        }
        Ok(Self { entries, metadata })
    }

    /// Interpret a parsed publisher payload as a record
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let raw: RawRecord = serde_json::from_value(value)?;
        Self::new(raw.entries, raw.metadata)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Publisher id, e.g. "crosswords/quick/17405"
    pub fn id(&self) -> Option<&str> {
        self.metadata.get("id").and_then(Value::as_str)
    }

    /// Publisher's own type tag ("crosswordType"), when present
    pub fn crossword_type(&self) -> Option<&str> {
        self.metadata.get("crosswordType").and_then(Value::as_str)
    }

    /// Publisher's own edition number, when present
    pub fn number(&self) -> Option<u64> {
        self.metadata.get("number").and_then(Value::as_u64)
    }
}

impl<'de> Deserialize<'de> for PuzzleRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRecord::deserialize(deserializer)?;
        Self::new(raw.entries, raw.metadata).map_err(serde::de::Error::custom)
    }
}

/// Reasons a payload is not a valid record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("No entries in puzzle data")]
    NoEntries,

    #[error("Invalid puzzle data: {0}")]
    Invalid(#[from] serde_json::Error),
}
