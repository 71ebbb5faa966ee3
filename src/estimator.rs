//! Edition number estimation.
//!
//! Maps a (puzzle type, date) pair to the edition most likely published on
//! that date, by extrapolating from the type's [`Anchor`](crate::models::Anchor)
//! according to its [`Cadence`]. Everything here is pure: callers supply
//! "today" explicitly, the wall clock is only read by [`today_utc`].

use chrono::{Datelike, NaiveDate, Utc, Weekday};

use crate::models::{Cadence, EditionNumber, PuzzleCatalog, PuzzleType};

/// Something that can guess the current edition of a puzzle type
pub trait Estimate: Send + Sync {
    fn estimate(&self, puzzle_type: &str, today: NaiveDate) -> EditionNumber;
}

impl Estimate for PuzzleCatalog {
    /// Unknown types are numbered like the catalog's default type.
    fn estimate(&self, puzzle_type: &str, today: NaiveDate) -> EditionNumber {
        estimate_edition(self.resolve(puzzle_type), today)
    }
}

/// Current UTC calendar date
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Estimate the edition of `puzzle_type` published on `today`
pub fn estimate_edition(puzzle_type: &PuzzleType, today: NaiveDate) -> EditionNumber {
    let anchor = puzzle_type.anchor;
    let reference = i64::from(anchor.number.get());

    let offset = match puzzle_type.cadence {
        Cadence::DailyExcept(rest_day) => publishing_day_offset(anchor.date, today, rest_day),
        Cadence::Weekly => nearest_week_offset(anchor.date, today),
    };

    EditionNumber::saturating_from(reference + offset)
}

/// Signed count of publishing days from `reference` to `today`.
///
/// Going forward, counts publishing days in `(reference, today]`; going
/// backward, the negated count over `(today, reference]`. A rest day therefore
/// carries the number of the publishing day before it.
pub fn publishing_day_offset(reference: NaiveDate, today: NaiveDate, rest_day: Weekday) -> i64 {
    if today >= reference {
        publishing_days_after(reference, today, rest_day) as i64
    } else {
        -(publishing_days_after(today, reference, rest_day) as i64)
    }
}

/// Number of days in `(from, to]` that are not `rest_day`
fn publishing_days_after(from: NaiveDate, to: NaiveDate, rest_day: Weekday) -> usize {
    from.iter_days()
        .skip(1)
        .take_while(|day| *day <= to)
        .filter(|day| day.weekday() != rest_day)
        .count()
}

/// Whole weeks between `reference` and `today`, rounded to the nearest week.
///
/// Day offsets are integers, so an offset is never exactly half a week; the
/// `+ 3` bias rounds 0-3 spare days down and 4-6 up in both directions.
pub fn nearest_week_offset(reference: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - reference).num_days();
    (days + 3).div_euclid(7)
}
