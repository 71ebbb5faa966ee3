//! Core data models for puzzles and retrieval.

mod puzzle;
mod record;
mod retrieval;

pub use puzzle::{
    Anchor, Cadence, CatalogError, EditionNumber, InvalidEditionNumber, PuzzleCatalog, PuzzleType,
    DEFAULT_PUZZLE_TYPE,
};
pub use record::{Direction, Entry, Position, PuzzleRecord, RecordError};
pub use retrieval::{AttemptOutcome, RetrievalAttempt, RetrievedPuzzle};
