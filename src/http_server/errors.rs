//! # Quiz API Errors
//!
//! The single boundary where internal errors become HTTP responses. Client
//! errors carry their message; internal faults are logged in full and the
//! client only sees a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::service::QuizError;
use crate::store::StoreError;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// Body could not be decoded into the expected shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Quiz(QuizError::QuestionNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Quiz(QuizError::NoQuestionsAvailable) => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,

            ApiError::Quiz(QuizError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured error kind, kept for logs even when the response is generic
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Quiz(QuizError::QuestionNotFound(_)) => "question_not_found",
            ApiError::Quiz(QuizError::NoQuestionsAvailable) => "no_questions_available",
            ApiError::Quiz(QuizError::Store(StoreError::Corruption { .. })) => "storage_corruption",
            ApiError::Quiz(QuizError::Store(_)) => "storage_fault",
            ApiError::MalformedBody(_) => "malformed_body",
            ApiError::RouteNotFound => "route_not_found",
        }
    }

    /// Message sent to the client
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.public_message(),
            code: err.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
