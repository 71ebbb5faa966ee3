//! Request handling: parameter normalization and the JSON output contract.
//!
//! A request names an optional puzzle type and an optional edition number,
//! both as raw strings. Responses carry an HTTP status and a JSON body: the
//! puzzle record itself on success, `{"error": "..."}` otherwise.

use chrono::NaiveDate;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::estimator::today_utc;
use crate::models::{CatalogError, EditionNumber, InvalidEditionNumber, RetrievalAttempt};
use crate::retrieval::{RetrievalError, Retriever};
use crate::sources::GuardianFetcher;
use crate::utils::HttpClientError;

/// Raw request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRequest {
    #[serde(default, rename = "type")]
    pub puzzle_type: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

impl PuzzleRequest {
    pub fn new(puzzle_type: Option<&str>, number: Option<&str>) -> Self {
        Self {
            puzzle_type: puzzle_type.map(str::to_string),
            number: number.map(str::to_string),
        }
    }
}

/// Status and JSON body of a handled request
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Candidate editions tried, for diagnostics; not part of the body
    pub attempts: Vec<RetrievalAttempt>,
}

impl PuzzleResponse {
    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
            attempts: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as JSON text
    pub fn body_text(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.body)
        } else {
            serde_json::to_string(&self.body)
        };
        rendered.unwrap_or_else(|_| self.body.to_string())
    }
}

/// Invalid request parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Invalid puzzle type: {0:?} (expected letters, digits, '-' or '_')")]
    InvalidType(String),

    #[error(transparent)]
    InvalidNumber(#[from] InvalidEditionNumber),
}

/// Errors setting up the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Http(#[from] HttpClientError),
}

/// Normalized request: a puzzle type and an optional explicit edition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub puzzle_type: String,
    pub number: Option<EditionNumber>,
}

/// Answers puzzle requests
#[derive(Debug, Clone)]
pub struct PuzzleService {
    retriever: Retriever,
    default_type: String,
}

impl PuzzleService {
    pub fn new(retriever: Retriever, default_type: impl Into<String>) -> Self {
        Self {
            retriever,
            default_type: default_type.into(),
        }
    }

    /// Build a service that fetches from the configured site
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let catalog = config.catalog()?;
        let fetcher = GuardianFetcher::from_config(&config.http)?;
        let retriever = Retriever::new(Arc::new(fetcher), Arc::new(catalog))
            .with_policy(config.search)
            .with_base_url(config.http.base_url.clone());

        Ok(Self::new(retriever, config.puzzles.default_type.clone()))
    }

    /// Apply defaults and validate raw parameters.
    ///
    /// Blank values count as absent. The type is trimmed and lowercased and
    /// must be a URL-safe slug; the number must be a positive integer.
    pub fn normalize(&self, request: &PuzzleRequest) -> Result<NormalizedRequest, RequestError> {
        let puzzle_type = match non_blank(request.puzzle_type.as_deref()) {
            Some(raw) => {
                let name = raw.to_lowercase();
                if !is_slug(&name) {
                    return Err(RequestError::InvalidType(raw.to_string()));
                }
                name
            }
            None => self.default_type.clone(),
        };

        let number = non_blank(request.number.as_deref())
            .map(str::parse::<EditionNumber>)
            .transpose()?;

        Ok(NormalizedRequest {
            puzzle_type,
            number,
        })
    }

    /// Handle a request using today's UTC date for estimates
    pub async fn handle(&self, request: &PuzzleRequest) -> PuzzleResponse {
        self.handle_on(request, today_utc()).await
    }

    /// Handle a request as if today were `today`
    pub async fn handle_on(&self, request: &PuzzleRequest, today: NaiveDate) -> PuzzleResponse {
        let normalized = match self.normalize(request) {
            Ok(normalized) => normalized,
            Err(err) => {
                tracing::warn!("Rejected request {:?}: {}", request, err);
                return PuzzleResponse::error(StatusCode::BAD_REQUEST, err.to_string());
            }
        };

        match self
            .retriever
            .retrieve_on(&normalized.puzzle_type, normalized.number, today)
            .await
        {
            Ok(found) => match serde_json::to_value(&found.record) {
                Ok(body) => PuzzleResponse {
                    status: StatusCode::OK,
                    body,
                    attempts: found.attempts,
                },
                Err(err) => PuzzleResponse::error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            },
            Err(err) => {
                tracing::error!("Puzzle fetch error: {}", err);
                let message = err.to_string();
                let RetrievalError::Exhausted { attempts, .. } = err;
                PuzzleResponse {
                    attempts,
                    ..PuzzleResponse::error(StatusCode::INTERNAL_SERVER_ERROR, message)
                }
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_slug(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PuzzleCatalog;
    use crate::sources::{MockFetcher, MockResponse};

    fn service(mock: &Arc<MockFetcher>) -> PuzzleService {
        let retriever = Retriever::new(mock.clone(), Arc::new(PuzzleCatalog::default()));
        PuzzleService::new(retriever, "quick")
    }

    fn page() -> String {
        r#"<div data-crossword-data='{"id":"crosswords/quick/7","entries":[{"clue":"Dog (3)","direction":"across","length":3,"position":{"x":0,"y":0}}]}'></div>"#.to_string()
    }

    #[test]
    fn test_normalize_defaults() {
        let svc = service(&Arc::new(MockFetcher::new()));
        let normalized = svc.normalize(&PuzzleRequest::default()).unwrap();
        assert_eq!(normalized.puzzle_type, "quick");
        assert_eq!(normalized.number, None);

        let blank = PuzzleRequest::new(Some("  "), Some(""));
        assert_eq!(svc.normalize(&blank).unwrap(), normalized);
    }

    #[test]
    fn test_normalize_type_and_number() {
        let svc = service(&Arc::new(MockFetcher::new()));
        let normalized = svc
            .normalize(&PuzzleRequest::new(Some(" Everyman "), Some("4123")))
            .unwrap();
        assert_eq!(normalized.puzzle_type, "everyman");
        assert_eq!(normalized.number, EditionNumber::new(4123));
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        let svc = service(&Arc::new(MockFetcher::new()));
        assert!(matches!(
            svc.normalize(&PuzzleRequest::new(Some("../admin"), None)),
            Err(RequestError::InvalidType(_))
        ));
        assert!(matches!(
            svc.normalize(&PuzzleRequest::new(None, Some("12abc"))),
            Err(RequestError::InvalidNumber(_))
        ));
        assert!(matches!(
            svc.normalize(&PuzzleRequest::new(None, Some("0"))),
            Err(RequestError::InvalidNumber(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_success_returns_record() {
        let mock = Arc::new(
            MockFetcher::new().with_response("quick", 7, MockResponse::Page(page())),
        );
        let response = service(&mock)
            .handle(&PuzzleRequest::new(None, Some("7")))
            .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.attempts.len(), 1);
        assert_eq!(response.body["id"], "crosswords/quick/7");
        assert_eq!(response.body["entries"][0]["clue"], "Dog (3)");
    }

    #[tokio::test]
    async fn test_handle_bad_request() {
        let mock = Arc::new(MockFetcher::new());
        let response = service(&mock)
            .handle(&PuzzleRequest::new(Some("quick"), Some("-1")))
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["error"].as_str().unwrap().contains("-1"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_handle_exhausted_search() {
        let mock = Arc::new(MockFetcher::new());
        let response = service(&mock)
            .handle(&PuzzleRequest::new(Some("quick"), Some("10")))
            .await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.attempts.len(), 8);
        assert_eq!(
            response.body,
            json!({"error": "Could not find a valid quick puzzle. Tried: 10, 9, 8, 7, 6, 5, 4, 3. Last error: unknown"})
        );
    }

    #[test]
    fn test_request_deserializes_query_names() {
        let request: PuzzleRequest =
            serde_json::from_str(r#"{"type": "everyman", "number": "4100"}"#).unwrap();
        assert_eq!(request, PuzzleRequest::new(Some("everyman"), Some("4100")));
    }
}
