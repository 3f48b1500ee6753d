//! Domain model for a user account.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Stored lowercased; lookups are case-insensitive
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: String, // RFC 3339 timestamp
}

impl User {
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("user::{}", epoch_millis)
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_and_normalize_email() {
        assert_eq!(User::generate_id(42), "user::42");
        assert_eq!(User::normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
