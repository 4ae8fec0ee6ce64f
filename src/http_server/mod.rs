//! # Quiz HTTP Server Module
//!
//! Combines the quiz and health routers into one axum server with CORS and
//! per-request tracing.
//!
//! # Endpoints
//!
//! - `GET /questions` - List questions
//! - `POST /questions/:id` - Check an answer
//! - `GET /random` - Random question
//! - `GET /health` - Health check

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod quiz_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
