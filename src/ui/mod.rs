//! Terminal output helpers for the command-line tool.
//!
//! Status lines go to stderr so stdout stays clean for JSON bodies. Colors
//! are only used when stderr is a terminal.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::estimator::estimate_edition;
use crate::models::{AttemptOutcome, PuzzleCatalog, RetrievalAttempt};

/// Check if stderr is a terminal.
pub fn is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    if !is_terminal() {
        eprintln!("{} {}", icon, msg);
        return;
    }

    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Status of a single retrieval attempt.
pub fn attempt_status(outcome: &AttemptOutcome) -> Status {
    match outcome {
        AttemptOutcome::Success => Status::Success,
        AttemptOutcome::NotFound => Status::Info,
        AttemptOutcome::ExtractionEmpty(_) => Status::Warning,
        AttemptOutcome::TransportError(_) | AttemptOutcome::ParseError(_) => Status::Error,
    }
}

/// Print one line per attempt, e.g. `✗ 17405: transport error: HTTP 500`.
pub fn print_attempts(attempts: &[RetrievalAttempt]) {
    for attempt in attempts {
        print_status(
            attempt_status(&attempt.outcome),
            &format!("{}: {}", attempt.number, attempt.outcome),
        );
    }
}

/// Render the catalog as aligned rows with each type's estimate for `today`.
pub fn catalog_rows(catalog: &PuzzleCatalog, today: NaiveDate) -> Vec<String> {
    let width = catalog.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let default_name = &catalog.default_type().name;

    catalog
        .iter()
        .map(|t| {
            let marker = if &t.name == default_name { "*" } else { " " };
            format!(
                "{} {:<width$}  {:<18}  anchor {} = {:<6}  today {}",
                marker,
                t.name,
                t.cadence.to_string(),
                t.anchor.date,
                t.anchor.number.get(),
                estimate_edition(t, today),
                width = width
            )
        })
        .collect()
}

/// Print the catalog to stdout.
pub fn print_catalog(catalog: &PuzzleCatalog, today: NaiveDate) {
    let rows = catalog_rows(catalog, today);
    if std::io::stdout().is_terminal() {
        println!("{}", format!("━━━ Puzzle types ({}) ━━━", today).bold().cyan());
    }
    for row in rows {
        println!("{}", row);
    }
}
