//! # User Repository
//!
//! Stores each account as `{user_directory}/user.yaml`. Accounts are
//! discovered by scanning the data directory, so there is no separate index
//! to keep in sync.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::CsvConnection;
use crate::domain::models::user::User;
use crate::storage::UserStorage;

pub const USER_FILE: &str = "user.yaml";

/// YAML-based user repository using filesystem discovery
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn get_user_yaml_path(&self, user_id: &str) -> PathBuf {
        self.connection.get_user_directory(user_id).join(USER_FILE)
    }

    fn load_user_from_path(path: &Path) -> Result<Option<User>> {
        if !path.exists() {
            return Ok(None);
        }
        let yaml_content = fs::read_to_string(path)?;
        let user: User = serde_yaml::from_str(&yaml_content)?;
        Ok(Some(user))
    }

    /// Load every account in the data directory, skipping unreadable ones
    fn discover_users(&self) -> Result<Vec<User>> {
        let mut users = Vec::new();

        for directory in self.connection.user_directories()? {
            match Self::load_user_from_path(&directory.join(USER_FILE)) {
                Ok(Some(user)) => users.push(user),
                Ok(None) => debug!("Directory {} doesn't contain a user", directory.display()),
                Err(e) => warn!("Error loading user from {}: {}", directory.display(), e),
            }
        }

        Ok(users)
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        let user_dir = self.connection.get_user_directory(&user.id);
        let yaml_path = user_dir.join(USER_FILE);
        if yaml_path.exists() {
            return Err(anyhow!("User {} already exists", user.id));
        }

        fs::create_dir_all(&user_dir)?;
        let yaml_content = serde_yaml::to_string(user)?;
        CsvConnection::write_atomic(&yaml_path, yaml_content.as_bytes())?;

        info!("Stored user {} ({})", user.id, user.username);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Self::load_user_from_path(&self.get_user_yaml_path(user_id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = User::normalize_email(email);
        let user = self
            .discover_users()?
            .into_iter()
            .find(|user| user.email == email);

        if user.is_none() {
            debug!("No user found for email {}", email);
        }
        Ok(user)
    }
}
