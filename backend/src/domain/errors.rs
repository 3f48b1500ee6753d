use shared::FieldError;

/// Failures a service reports to its caller
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("This email address is already registered. Please log in instead.")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session is missing or has expired")]
    Unauthorized,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
