use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUBSCRIPTIONS_FILE: &str = "subscriptions.csv";
pub const SUBSCRIPTIONS_HEADER: &str =
    "id,service_name,billing_amount,currency,billing_frequency,last_billing_date,created_at\n";

/// CsvConnection manages file paths and ensures per-user data files exist
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Generate a safe filesystem name from a user ID
    /// Converts "user::1718000000000" -> "user_1718000000000"
    pub fn safe_directory_name(user_id: &str) -> String {
        let mut name = String::with_capacity(user_id.len());
        for c in user_id.chars() {
            if c.is_ascii_alphanumeric() || c == '-' {
                name.push(c);
            } else if !name.ends_with('_') {
                name.push('_');
            }
        }
        name.trim_matches('_').to_string()
    }

    /// Get the directory holding a user's data
    pub fn get_user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory.join(Self::safe_directory_name(user_id))
    }

    /// Get the file path for a user's subscriptions
    pub fn get_subscriptions_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join(SUBSCRIPTIONS_FILE)
    }

    /// Ensure a CSV file exists with proper header for the user
    pub fn ensure_subscriptions_file_exists(&self, user_id: &str) -> Result<PathBuf> {
        let user_dir = self.get_user_directory(user_id);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }

        let file_path = user_dir.join(SUBSCRIPTIONS_FILE);
        if !file_path.exists() {
            fs::write(&file_path, SUBSCRIPTIONS_HEADER)?;
            debug!("Created subscriptions file: {}", file_path.display());
        }

        Ok(file_path)
    }

    /// List the names of all user directories
    pub fn user_directories(&self) -> Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        if !self.base_directory.exists() {
            return Ok(directories);
        }

        for entry in fs::read_dir(&self.base_directory)? {
            let path = entry?.path();
            if path.is_dir() {
                directories.push(path);
            }
        }

        directories.sort();
        Ok(directories)
    }

    /// Write a file atomically: write to a temp file, then rename
    pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(CsvConnection::safe_directory_name("user::1718000000000"), "user_1718000000000");
        assert_eq!(CsvConnection::safe_directory_name("../../etc"), "etc");
        assert_eq!(CsvConnection::safe_directory_name("a b/c"), "a_b_c");
    }

    #[test]
    fn test_new_creates_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");
        let connection = CsvConnection::new(&base).unwrap();
        assert!(base.is_dir());
        assert_eq!(connection.base_directory(), base.as_path());
    }

    #[test]
    fn test_ensure_subscriptions_file_writes_header_once() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let path = connection.ensure_subscriptions_file_exists("user::1").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SUBSCRIPTIONS_HEADER);

        fs::write(&path, format!("{}row\n", SUBSCRIPTIONS_HEADER)).unwrap();
        connection.ensure_subscriptions_file_exists("user::1").unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("row\n"));
    }

    #[test]
    fn test_user_directories_lists_only_directories() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        connection.ensure_subscriptions_file_exists("user::2").unwrap();
        connection.ensure_subscriptions_file_exists("user::1").unwrap();
        fs::write(temp_dir.path().join("stray.txt"), "x").unwrap();

        let dirs = connection.user_directories().unwrap();
        let names: Vec<String> = dirs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["user_1", "user_2"]);
    }
}
