//! # Account Service
//!
//! Sign-up, log-in and session lookup. Passwords are stored as Argon2 PHC
//! strings; sessions are opaque bearer tokens held in memory for seven days,
//! so restarting the server logs everyone out.

use anyhow::anyhow;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use rand_core::OsRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::commands::account::{LogInCommand, LogInResult, SignUpCommand, SignUpResult};
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::user::User;
use crate::domain::validation::{validate_log_in, validate_sign_up};
use crate::storage::csv::UserRepository;
use crate::storage::UserStorage;

/// How long a log-in stays valid
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// Service for account registration and sessions
#[derive(Clone)]
pub struct AccountService {
    user_repository: UserRepository,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    /// Held across the email check, ID allocation and write of a sign-up
    sign_up_lock: Arc<AsyncMutex<()>>,
    session_ttl: Duration,
}

impl AccountService {
    pub fn new(user_repository: UserRepository) -> Self {
        Self {
            user_repository,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            sign_up_lock: Arc::new(AsyncMutex::new(())),
            session_ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Register a new account
    pub async fn sign_up(&self, command: SignUpCommand) -> ServiceResult<SignUpResult> {
        info!("Signing up user: username={}", command.username.trim());

        let validation = validate_sign_up(&command);
        if !validation.is_valid {
            return Err(ServiceError::Validation(validation.errors));
        }

        let email = User::normalize_email(&command.email);
        let password_hash = hash_password(&command.password)?;

        let _guard = self.sign_up_lock.lock().await;

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            warn!("Sign-up rejected, email already registered: {}", email);
            return Err(ServiceError::EmailTaken);
        }

        let now = Utc::now();
        let mut epoch_millis = now.timestamp_millis() as u64;
        while self.user_repository.get_user(&User::generate_id(epoch_millis)).await?.is_some() {
            epoch_millis += 1;
        }

        let user = User {
            id: User::generate_id(epoch_millis),
            username: command.username.trim().to_string(),
            email,
            password_hash,
            created_at: now.to_rfc3339(),
        };
        self.user_repository.store_user(&user).await?;

        info!("Created user {} with ID: {}", user.username, user.id);

        Ok(SignUpResult {
            user,
            success_message: "Account created successfully".to_string(),
        })
    }

    /// Check credentials and open a session
    pub async fn log_in(&self, command: LogInCommand) -> ServiceResult<LogInResult> {
        let validation = validate_log_in(&command);
        if !validation.is_valid {
            return Err(ServiceError::Validation(validation.errors));
        }

        let email = User::normalize_email(&command.email);
        let user = match self.user_repository.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("Log-in failed, unknown email: {}", email);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password(&command.password, &user.password_hash)? {
            warn!("Log-in failed, wrong password for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| anyhow!("Session table lock poisoned"))?;
            sessions.retain(|_, session| session.expires_at > now);
            sessions.insert(
                token.clone(),
                Session {
                    user_id: user.id.clone(),
                    expires_at: now + self.session_ttl,
                },
            );
        }

        info!("User {} logged in", user.id);
        Ok(LogInResult { token, user })
    }

    /// Map a bearer token to its user ID. Expired sessions are dropped.
    pub fn resolve_session(&self, token: &str) -> ServiceResult<String> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("Session table lock poisoned"))?;

        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => return Ok(session.user_id.clone()),
            Some(_) => {}
            None => return Err(ServiceError::Unauthorized),
        }

        if let Some(session) = sessions.remove(token) {
            info!("Session for user {} expired", session.user_id);
        }
        Err(ServiceError::Unauthorized)
    }

    /// Close a session. Unknown tokens are ignored.
    pub fn log_out(&self, token: &str) -> ServiceResult<()> {
        let removed = self
            .sessions
            .lock()
            .map_err(|_| anyhow!("Session table lock poisoned"))?
            .remove(token);
        if let Some(session) = removed {
            info!("User {} logged out", session.user_id);
        }
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> ServiceResult<Option<User>> {
        Ok(self.user_repository.get_user(user_id).await?)
    }
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| anyhow!("Hash parse error: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
