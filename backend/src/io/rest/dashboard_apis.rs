//! # REST API for the Dashboard
//!
//! Returns the projected billing view for the current user. The optional
//! `as_of` query parameter evaluates the projection at midnight UTC of that
//! date instead of the current time.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info, warn};
use shared::DashboardRequest;

use super::error::ApiError;
use super::mappers::SubscriptionMapper;
use super::session::CurrentUser;
use crate::domain::models::subscription::DATE_FORMAT;
use crate::AppState;

fn evaluation_time(as_of: Option<&str>) -> Result<DateTime<Utc>, ApiError> {
    match as_of {
        None => Ok(Utc::now()),
        Some(value) => NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| ApiError::BadRequest(format!("as_of '{}' is not a YYYY-MM-DD date", value))),
    }
}

/// Get the billing dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(request): Query<DashboardRequest>,
) -> impl IntoResponse {
    info!("GET /api/dashboard - user: {}, as_of: {:?}", user.user_id, request.as_of);

    let now = match evaluation_time(request.as_of.as_deref()) {
        Ok(now) => now,
        Err(e) => {
            warn!("Rejected dashboard request: {}", e);
            return e.into_response();
        }
    };

    match state.subscription_service.get_dashboard(&user.user_id, now).await {
        Ok(dashboard) => (
            StatusCode::OK,
            Json(SubscriptionMapper::to_dashboard_response(dashboard)),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_evaluation_time_uses_midnight_utc() {
        let now = evaluation_time(Some("2024-12-01")).unwrap();
        assert_eq!(now, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_evaluation_time_rejects_malformed_dates() {
        assert!(matches!(evaluation_time(Some("01/12/2024")), Err(ApiError::BadRequest(_))));
        assert!(matches!(evaluation_time(Some("2024-02-30")), Err(ApiError::BadRequest(_))));
    }
}
