use crate::domain::commands::account::{LogInCommand, LogInResult, SignUpCommand, SignUpResult};
use crate::domain::models::user::User;
use shared::{LoginRequest, LoginResponse, SignUpRequest, SignUpResponse, UserProfile};

/// Mapper between shared account DTOs and domain models.
pub struct UserMapper;

impl UserMapper {
    pub fn to_sign_up_command(request: SignUpRequest) -> SignUpCommand {
        SignUpCommand {
            username: request.username,
            email: request.email,
            password: request.password,
        }
    }

    pub fn to_log_in_command(request: LoginRequest) -> LogInCommand {
        LogInCommand {
            email: request.email,
            password: request.password,
        }
    }

    /// The password hash is dropped here and never leaves the backend.
    pub fn to_profile(user: User) -> UserProfile {
        UserProfile {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }

    pub fn to_sign_up_response(result: SignUpResult) -> SignUpResponse {
        SignUpResponse {
            user: Self::to_profile(result.user),
            success_message: result.success_message,
        }
    }

    pub fn to_login_response(result: LogInResult) -> LoginResponse {
        LoginResponse {
            token: result.token,
            user: Self::to_profile(result.user),
        }
    }
}
