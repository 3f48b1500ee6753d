use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::error::ApiError;
use crate::AppState;

/// The user behind a request's `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let user_id = state.account_service.resolve_session(&token)?;
        Ok(CurrentUser { user_id, token })
    }
}
