//! # REST API for Accounts
//!
//! Sign-up, log-in and log-out. Log-in returns the bearer token that every
//! subscription and dashboard endpoint expects.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use shared::{LoginRequest, SignUpRequest};

use super::error::ApiError;
use super::mappers::UserMapper;
use super::session::CurrentUser;
use crate::AppState;

/// Create a new account
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/signup - username: {}", request.username);

    let command = UserMapper::to_sign_up_command(request);
    match state.account_service.sign_up(command).await {
        Ok(result) => (StatusCode::CREATED, Json(UserMapper::to_sign_up_response(result))).into_response(),
        Err(e) => {
            error!("Failed to sign up: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Log in and receive a session token
pub async fn log_in(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    let command = UserMapper::to_log_in_command(request);
    match state.account_service.log_in(command).await {
        Ok(result) => (StatusCode::OK, Json(UserMapper::to_login_response(result))).into_response(),
        Err(e) => {
            error!("Failed to log in: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// End the caller's session
pub async fn log_out(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    info!("POST /api/auth/logout - user: {}", user.user_id);

    match state.account_service.log_out(&user.token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to log out: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
