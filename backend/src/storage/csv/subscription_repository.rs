//! # CSV Subscription Repository
//!
//! Stores each user's subscriptions in `{user_directory}/subscriptions.csv`.
//!
//! ```text
//! data/
//! └── {user_id}/
//!     ├── user.yaml
//!     └── subscriptions.csv    ← This module manages these files
//! ```
//!
//! Rows are kept as text. Turning them into typed subscriptions (and
//! reporting the ones that don't parse) is the domain layer's job.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, Writer};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::connection::CsvConnection;
use crate::domain::models::subscription::{Subscription, SubscriptionRecord};
use crate::storage::SubscriptionStorage;

/// CSV-based subscription repository
#[derive(Clone)]
pub struct SubscriptionRepository {
    connection: CsvConnection,
    write_lock: Arc<Mutex<()>>,
}

impl SubscriptionRepository {
    /// Create a new CSV subscription repository
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read all subscription rows for a user from their CSV file
    fn read_records(&self, user_id: &str) -> Result<Vec<SubscriptionRecord>> {
        let file_path = self.connection.ensure_subscriptions_file_exists(user_id)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;

        let mut records = Vec::new();
        for (index, result) in reader.deserialize::<SubscriptionRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Skipping unreadable row {} in {}: {}",
                        index + 1,
                        file_path.display(),
                        e
                    );
                }
            }
        }

        debug!("Read {} subscription rows for user {}", records.len(), user_id);
        Ok(records)
    }

    /// Write all subscription rows for a user to their CSV file. The header
    /// row comes from serializing the first record, so `records` must not be empty.
    fn write_records(&self, user_id: &str, records: &[SubscriptionRecord]) -> Result<()> {
        let file_path = self.connection.ensure_subscriptions_file_exists(user_id)?;

        let mut writer = Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush subscriptions CSV: {}", e))?;

        CsvConnection::write_atomic(&file_path, &bytes)
    }
}

#[async_trait]
impl SubscriptionStorage for SubscriptionRepository {
    async fn store_subscription(&self, user_id: &str, subscription: &Subscription) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Subscription write lock poisoned"))?;

        let mut records = self.read_records(user_id)?;
        if records.iter().any(|r| r.id == subscription.id) {
            return Err(anyhow!("Subscription {} already exists", subscription.id));
        }
        records.push(SubscriptionRecord::from(subscription));
        self.write_records(user_id, &records)?;

        info!(
            "Stored subscription {} ({}) for user {}",
            subscription.id, subscription.service_name, user_id
        );
        Ok(())
    }

    async fn list_subscription_records(&self, user_id: &str) -> Result<Vec<SubscriptionRecord>> {
        self.read_records(user_id)
    }
}
