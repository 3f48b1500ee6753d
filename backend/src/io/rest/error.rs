use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use shared::{ErrorResponse, FieldError};
use thiserror::Error;

use crate::domain::ServiceError;

/// Errors returned by REST handlers, rendered as `ErrorResponse` JSON
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            e @ ServiceError::EmailTaken => ApiError::Conflict(e.to_string()),
            e @ (ServiceError::InvalidCredentials | ServiceError::Unauthorized) => {
                ApiError::Unauthorized(e.to_string())
            }
            ServiceError::Storage(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(ref e) => {
                error!("Internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match self {
            ApiError::Validation(details) => ErrorResponse {
                error: details
                    .first()
                    .map(|d| d.message.clone())
                    .unwrap_or_else(|| "Validation failed".to_string()),
                details,
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = vec![
            (ServiceError::Validation(vec![FieldError::new("email", "bad")]), StatusCode::BAD_REQUEST),
            (ServiceError::EmailTaken, StatusCode::CONFLICT),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::Storage(anyhow::anyhow!("disk full")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (service_error, expected) in cases {
            let response = ApiError::from(service_error).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        let api_error = ApiError::from(ServiceError::Storage(anyhow::anyhow!("/secret/path missing")));
        assert_eq!(api_error.to_string(), "Internal server error");
    }
}
