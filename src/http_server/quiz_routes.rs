//! Quiz HTTP Routes
//!
//! - `GET /questions` - every question without its answer
//! - `POST /questions/:id` - check a submitted answer
//! - `GET /random` - one random question without its answer

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::question::{QuestionId, QuestionView};
use crate::service::QuizService;

// ==================
// Shared State
// ==================

/// Quiz state shared across handlers
pub struct QuizState {
    pub service: Arc<QuizService>,
}

impl QuizState {
    pub fn new(service: Arc<QuizService>) -> Self {
        Self { service }
    }
}

// ==================
// Request/Response Types
// ==================

/// Body of `POST /questions/:id`. Any JSON value is accepted as the answer;
/// only a string can ever be correct.
#[derive(Debug, Deserialize)]
pub struct CheckAnswerRequest {
    #[serde(default)]
    pub answer: Option<Value>,
}

impl CheckAnswerRequest {
    /// The submitted answer when it is a string
    pub fn submitted(&self) -> Option<&str> {
        self.answer.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize)]
pub struct CheckAnswerResponse {
    pub is_correct: bool,
}

// ==================
// Quiz Routes
// ==================

/// Create quiz routes
pub fn quiz_routes(state: Arc<QuizState>) -> Router {
    Router::new()
        .route("/questions", get(list_questions_handler))
        .route("/questions/:id", post(check_answer_handler))
        .route("/random", get(random_question_handler))
        .with_state(state)
}

async fn list_questions_handler(
    State(state): State<Arc<QuizState>>,
) -> ApiResult<Json<Vec<QuestionView>>> {
    Ok(Json(state.service.list_questions()?))
}

async fn check_answer_handler(
    State(state): State<Arc<QuizState>>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<CheckAnswerRequest>, JsonRejection>,
) -> ApiResult<Json<CheckAnswerResponse>> {
    // Only integer ids name a question; anything else is an unknown route.
    let Path(id) = id.map_err(|_| ApiError::RouteNotFound)?;
    let Json(request) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;

    let is_correct = state
        .service
        .check_answer(QuestionId(id), request.submitted())?;

    Ok(Json(CheckAnswerResponse { is_correct }))
}

async fn random_question_handler(
    State(state): State<Arc<QuizState>>,
) -> ApiResult<Json<QuestionView>> {
    Ok(Json(state.service.random_question()?))
}

/// Fallback for unknown routes
pub async fn route_not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_answer_request_missing_answer() {
        let request: CheckAnswerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.answer, None);

        let request: CheckAnswerRequest = serde_json::from_str(r#"{"answer": null}"#).unwrap();
        assert_eq!(request.answer, None);
    }

    #[test]
    fn test_check_answer_request_rejects_non_object() {
        assert!(serde_json::from_str::<CheckAnswerRequest>("null").is_err());
        assert!(serde_json::from_str::<CheckAnswerRequest>(r#"["Paris"]"#).is_err());
        assert!(serde_json::from_str::<CheckAnswerRequest>("not json").is_err());
    }

    #[test]
    fn test_non_string_answer_is_never_submitted() {
        for body in [r#"{"answer": 4}"#, r#"{"answer": ["Paris"]}"#, r#"{"answer": true}"#] {
            let request: CheckAnswerRequest = serde_json::from_str(body).unwrap();
            assert!(request.answer.is_some());
            assert_eq!(request.submitted(), None);
        }

        let request: CheckAnswerRequest = serde_json::from_str(r#"{"answer": "Paris"}"#).unwrap();
        assert_eq!(request.submitted(), Some("Paris"));
    }
}
