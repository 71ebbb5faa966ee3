//! Integration tests for Crossword Fetch
//!
//! These tests drive the retrieval loop and the request service end to end,
//! with scripted pages and with a local HTTP server.

use chrono::NaiveDate;
use crossword_fetch::config::Config;
use crossword_fetch::estimator::Estimate;
use crossword_fetch::extract::{extract_traced, Pattern};
use crossword_fetch::models::{AttemptOutcome, EditionNumber, PuzzleCatalog};
use crossword_fetch::retrieval::{RetrievalError, Retriever};
use crossword_fetch::service::{PuzzleRequest, PuzzleService};
use crossword_fetch::sources::{MockFetcher, MockResponse};
use serde_json::json;
use std::sync::Arc;

/// Estimator that must never be consulted
struct NoEstimate;

impl Estimate for NoEstimate {
    fn estimate(&self, puzzle_type: &str, _today: NaiveDate) -> EditionNumber {
        panic!("estimator called for {}", puzzle_type);
    }
}

fn n(value: u32) -> EditionNumber {
    EditionNumber::new(value).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn puzzle_json(puzzle_type: &str, number: u32, entries: usize) -> serde_json::Value {
    let entries: Vec<_> = (0..entries)
        .map(|i| {
            json!({
                "id": format!("{}-across", i + 1),
                "number": i + 1,
                "clue": format!("Clue number {} (5)", i + 1),
                "direction": if i % 2 == 0 { "across" } else { "down" },
                "length": 5,
                "position": {"x": i % 15, "y": i / 15},
                "solution": "ABCDE"
            })
        })
        .collect();

    json!({
        "id": format!("crosswords/{}/{}", puzzle_type, number),
        "number": number,
        "name": format!("Quick crossword No {}", number),
        "crosswordType": puzzle_type,
        "dimensions": {"cols": 15, "rows": 15},
        "entries": entries
    })
}

/// Current page layout: props in single quotes, name before props
fn island_page(puzzle_type: &str, number: u32, entries: usize) -> String {
    let props = json!({ "data": puzzle_json(puzzle_type, number, entries) });
    format!(
        r#"<!DOCTYPE html><html><body><gu-island name="CrosswordComponent" priority="critical" props='{}'></gu-island></body></html>"#,
        props
    )
}

/// Props in double quotes with every quote entity-encoded
fn encoded_island_page(puzzle_type: &str, number: u32, entries: usize) -> String {
    let props = json!({ "data": puzzle_json(puzzle_type, number, entries) })
        .to_string()
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;");
    format!(
        r#"<html><body><gu-island name="CrosswordComponent" deferuntil="visible" props="{}"></gu-island></body></html>"#,
        props
    )
}

#[tokio::test]
async fn test_estimated_search_finds_fourth_candidate() {
    // 2026-02-24 estimates to 17411 for the quick
    let mock = Arc::new(
        MockFetcher::new().with_response("quick", 17408, MockResponse::Page(island_page("quick", 17408, 30))),
    );
    let retriever = Retriever::new(mock.clone(), Arc::new(PuzzleCatalog::default()));

    let found = retriever
        .retrieve_on("quick", None, date(2026, 2, 24))
        .await
        .unwrap();

    assert_eq!(found.number, n(17408));
    assert_eq!(found.record.entries().len(), 30);
    assert_eq!(found.record.id(), Some("crosswords/quick/17408"));
    assert_eq!(
        mock.requested_numbers(),
        vec![n(17411), n(17410), n(17409), n(17408)]
    );

    let outcomes: Vec<_> = found.attempts.iter().map(|a| a.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            AttemptOutcome::NotFound,
            AttemptOutcome::NotFound,
            AttemptOutcome::NotFound,
            AttemptOutcome::Success,
        ]
    );
}

#[tokio::test]
async fn test_all_candidates_missing() {
    let mock = Arc::new(MockFetcher::new());
    let retriever = Retriever::new(mock.clone(), Arc::new(PuzzleCatalog::default()));

    let err = retriever
        .retrieve_on("quick", None, date(2026, 2, 24))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Could not find a valid quick puzzle. Tried: 17411, 17410, 17409, 17408, 17407, 17406, 17405, 17404. Last error: unknown"
    );
    assert_eq!(mock.requests().len(), 8);

    let RetrievalError::Exhausted { tried, attempts, .. } = err;
    assert_eq!(tried.len(), 8);
    assert!(attempts.iter().all(|a| a.outcome == AttemptOutcome::NotFound));
}

#[tokio::test]
async fn test_explicit_number_skips_estimator() {
    let mock = Arc::new(
        MockFetcher::new()
            .with_response("everyman", 4000, MockResponse::Status(500))
            .with_response("everyman", 3999, MockResponse::Page(island_page("everyman", 3999, 12))),
    );
    let retriever = Retriever::new(mock.clone(), Arc::new(NoEstimate));

    let found = retriever
        .retrieve("everyman", Some(n(4000)))
        .await
        .unwrap();

    assert_eq!(found.number, n(3999));
    assert_eq!(mock.requested_numbers(), vec![n(4000), n(3999)]);
    assert_eq!(
        mock.requests()[0].as_str(),
        "https://www.theguardian.com/crosswords/everyman/4000"
    );
}

#[tokio::test]
async fn test_encoded_page_is_found_through_search() {
    let mock = Arc::new(
        MockFetcher::new().with_response("quick", 321, MockResponse::Page(encoded_island_page("quick", 321, 4))),
    );
    let retriever = Retriever::new(mock, Arc::new(NoEstimate));

    let found = retriever.retrieve("quick", Some(n(321))).await.unwrap();
    assert_eq!(found.record.entries().len(), 4);
    assert_eq!(found.record.number(), Some(321));
}

#[test]
fn test_encoded_island_uses_third_pattern() {
    let html = encoded_island_page("quick", 17405, 3);
    let extraction = extract_traced(&html, "quick").unwrap();

    assert_eq!(extraction.pattern, Pattern::EncodedIslandNameFirst);
    assert_eq!(extraction.record.entries().len(), 3);
    assert_eq!(extraction.record.entries()[0].clue(), Some("Clue number 1 (5)"));
    assert_eq!(extraction.record.crossword_type(), Some("quick"));
}

#[tokio::test]
async fn test_service_against_http_server() {
    let mut server = mockito::Server::new_async().await;
    let missing = server
        .mock("GET", "/crosswords/quick/101")
        .with_status(404)
        .create_async()
        .await;
    let found = server
        .mock("GET", "/crosswords/quick/100")
        .match_header("user-agent", mockito::Matcher::Regex("Mozilla".to_string()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(island_page("quick", 100, 6))
        .create_async()
        .await;

    let mut config = Config::default();
    config.http.base_url = format!("{}/crosswords", server.url());
    config.http.timeout_secs = 5;
    let service = PuzzleService::from_config(&config).unwrap();

    let response = service
        .handle(&PuzzleRequest::new(Some("QUICK"), Some(" 101 ")))
        .await;

    missing.assert_async().await;
    found.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.body["id"], "crosswords/quick/100");
    assert_eq!(response.body["dimensions"]["cols"], 15);
    assert_eq!(response.body["entries"].as_array().unwrap().len(), 6);
    assert_eq!(response.attempts.len(), 2);
}

#[tokio::test]
async fn test_service_reports_server_errors() {
    let mut server = mockito::Server::new_async().await;
    let _failing = server
        .mock("GET", mockito::Matcher::Regex(r"^/crosswords/everyman/\d+$".to_string()))
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let mut config = Config::default();
    config.http.base_url = format!("{}/crosswords", server.url());
    config.search.max_attempts = 3;
    let service = PuzzleService::from_config(&config).unwrap();

    let response = service
        .handle(&PuzzleRequest::new(Some("everyman"), Some("50")))
        .await;

    assert_eq!(response.status.as_u16(), 500);
    assert_eq!(
        response.body,
        json!({"error": "Could not find a valid everyman puzzle. Tried: 50, 49, 48. Last error: Puzzle 48: HTTP 503"})
    );
}

#[tokio::test]
async fn test_service_rejects_invalid_number() {
    let mock = Arc::new(MockFetcher::new());
    let retriever = Retriever::new(mock.clone(), Arc::new(NoEstimate));
    let service = PuzzleService::new(retriever, "quick");

    let response = service
        .handle(&PuzzleRequest::new(None, Some("abc")))
        .await;

    assert_eq!(response.status.as_u16(), 400);
    assert!(response.body["error"].is_string());
    assert!(mock.requests().is_empty());
}
