//! # REST API for Subscriptions
//!
//! Adding and listing the current user's subscriptions.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use shared::CreateSubscriptionRequest;

use super::error::ApiError;
use super::mappers::SubscriptionMapper;
use super::session::CurrentUser;
use crate::AppState;

/// Add a subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateSubscriptionRequest>,
) -> impl IntoResponse {
    info!("POST /api/subscriptions - user: {}, request: {:?}", user.user_id, request);

    let command = SubscriptionMapper::to_create_command(request);
    match state
        .subscription_service
        .create_subscription(&user.user_id, command)
        .await
    {
        Ok(result) => (
            StatusCode::CREATED,
            Json(SubscriptionMapper::to_create_response(result)),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create subscription: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// List subscriptions in the order they were added
pub async fn list_subscriptions(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    info!("GET /api/subscriptions - user: {}", user.user_id);

    match state.subscription_service.list_subscriptions(&user.user_id).await {
        Ok(subscriptions) => (
            StatusCode::OK,
            Json(SubscriptionMapper::to_list_response(subscriptions)),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to list subscriptions: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
