//! Puzzle types, their numbering anchors and the catalog of known types.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the type used when a request does not name one.
pub const DEFAULT_PUZZLE_TYPE: &str = "quick";

/// Sequential number identifying one published puzzle of a type.
///
/// Edition numbers are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct EditionNumber(u32);

impl EditionNumber {
    /// Create an edition number, rejecting zero
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Create an edition number from a signed value, clamping anything below 1
    pub fn saturating_from(value: i64) -> Self {
        Self(value.clamp(1, u32::MAX as i64) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The edition `offset` steps before this one, if it is still positive
    pub fn checked_back(self, offset: u32) -> Option<Self> {
        self.0.checked_sub(offset).and_then(Self::new)
    }

    /// The edition `offset` steps after this one
    pub fn checked_forward(self, offset: u32) -> Option<Self> {
        self.0.checked_add(offset).map(Self)
    }
}

impl fmt::Display for EditionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EditionNumber> for u32 {
    fn from(number: EditionNumber) -> Self {
        number.0
    }
}

impl TryFrom<u32> for EditionNumber {
    type Error = InvalidEditionNumber;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| InvalidEditionNumber(value.to_string()))
    }
}

impl FromStr for EditionNumber {
    type Err = InvalidEditionNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidEditionNumber(s.to_string()))
    }
}

/// A value that is not a positive edition number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid edition number: {0:?} (expected a positive integer)")]
pub struct InvalidEditionNumber(pub String);

/// Publication frequency of a puzzle type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Published every day except one weekly rest day, which gets no number
    DailyExcept(Weekday),
    /// Published once per week
    Weekly,
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::DailyExcept(rest_day) => write!(f, "daily except {}", rest_day),
            Cadence::Weekly => write!(f, "weekly"),
        }
    }
}

/// Known (date, edition) pair that every other edition is extrapolated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub date: NaiveDate,
    pub number: EditionNumber,
}

/// A crossword series with its numbering rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleType {
    /// Identifier, also the URL path segment (e.g. "quick")
    pub name: String,
    pub anchor: Anchor,
    pub cadence: Cadence,
}

impl PuzzleType {
    pub fn new(name: impl Into<String>, anchor: Anchor, cadence: Cadence) -> Self {
        Self {
            name: name.into(),
            anchor,
            cadence,
        }
    }

    /// Quick crossword: Monday to Saturday, no Sunday edition.
    pub fn quick() -> Self {
        Self::new(
            "quick",
            Anchor {
                date: NaiveDate::from_ymd_opt(2026, 2, 17).expect("valid anchor date"),
                number: EditionNumber(17405),
            },
            Cadence::DailyExcept(Weekday::Sun),
        )
    }

    /// Everyman: one puzzle a week.
    pub fn everyman() -> Self {
        Self::new(
            "everyman",
            Anchor {
                date: NaiveDate::from_ymd_opt(2026, 2, 16).expect("valid anchor date"),
                number: EditionNumber(4123),
            },
            Cadence::Weekly,
        )
    }
}

/// The set of puzzle types the estimator knows about.
///
/// Always contains its default type, so resolving a name never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleCatalog {
    types: Vec<PuzzleType>,
    default_index: usize,
}

impl PuzzleCatalog {
    /// Build a catalog; `default_type` must name one of `types`
    pub fn new(types: Vec<PuzzleType>, default_type: &str) -> Result<Self, CatalogError> {
        let default_index = types
            .iter()
            .position(|t| t.name == default_type)
            .ok_or_else(|| CatalogError::UnknownDefault(default_type.to_string()))?;

        Ok(Self {
            types,
            default_index,
        })
    }

    /// Add a type, replacing any existing type with the same name
    pub fn insert(&mut self, puzzle_type: PuzzleType) {
        match self.types.iter_mut().find(|t| t.name == puzzle_type.name) {
            Some(existing) => *existing = puzzle_type,
            None => self.types.push(puzzle_type),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PuzzleType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn default_type(&self) -> &PuzzleType {
        &self.types[self.default_index]
    }

    /// Look up a type by name, falling back to the default type
    pub fn resolve(&self, name: &str) -> &PuzzleType {
        self.get(name).unwrap_or_else(|| {
            tracing::debug!(
                "Unknown puzzle type '{}', using '{}' numbering",
                name,
                self.default_type().name
            );
            self.default_type()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PuzzleType> {
        self.types.iter()
    }
}

impl Default for PuzzleCatalog {
    fn default() -> Self {
        Self {
            types: vec![PuzzleType::quick(), PuzzleType::everyman()],
            default_index: 0,
        }
    }
}

/// Errors building a catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Default puzzle type '{0}' is not defined")]
    UnknownDefault(String),
}
