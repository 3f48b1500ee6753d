//! # REST API Interface Layer
//!
//! HTTP endpoints for Sub-Minder. Handlers translate shared DTOs into domain
//! commands, call the services on `AppState`, and map results (or
//! `ServiceError`s) back to JSON responses.
//!
//! Authenticated endpoints take a [`session::CurrentUser`] extractor, which
//! resolves the `Authorization: Bearer` token before the handler runs.

pub mod auth_apis;
pub mod dashboard_apis;
pub mod error;
pub mod mappers;
pub mod session;
pub mod subscription_apis;

pub use auth_apis::{log_in, log_out, sign_up};
pub use dashboard_apis::get_dashboard;
pub use error::ApiError;
pub use session::CurrentUser;
pub use subscription_apis::{create_subscription, list_subscriptions};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
