use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::billing_projector::{build_dashboard, Dashboard};
use crate::domain::commands::subscriptions::{CreateSubscriptionCommand, CreateSubscriptionResult};
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::subscription::Subscription;
use crate::domain::validation::parse_subscription_form;
use crate::storage::csv::SubscriptionRepository;
use crate::storage::SubscriptionStorage;

/// Service for a user's subscriptions and their billing dashboard
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repository: SubscriptionRepository,
    /// Held while a new ID is allocated and written
    create_lock: Arc<Mutex<()>>,
}

impl SubscriptionService {
    pub fn new(subscription_repository: SubscriptionRepository) -> Self {
        Self {
            subscription_repository,
            create_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Validate the add-subscription form and store the result
    pub async fn create_subscription(
        &self,
        user_id: &str,
        command: CreateSubscriptionCommand,
    ) -> ServiceResult<CreateSubscriptionResult> {
        info!(
            "Creating subscription for user {}: service={}, frequency={}",
            user_id, command.service_name, command.billing_frequency
        );

        let draft = parse_subscription_form(&command).map_err(|validation| {
            warn!("Rejected subscription form: {:?}", validation.first_error());
            ServiceError::Validation(validation.errors)
        })?;

        let _guard = self.create_lock.lock().await;

        let existing_ids: HashSet<String> = self
            .subscription_repository
            .list_subscription_records(user_id)
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();

        let now = Utc::now();
        let mut epoch_millis = now.timestamp_millis() as u64;
        while existing_ids.contains(&Subscription::generate_id(epoch_millis)) {
            epoch_millis += 1;
        }

        let subscription = Subscription {
            id: Subscription::generate_id(epoch_millis),
            service_name: draft.service_name,
            billing_amount: draft.billing_amount,
            currency: draft.currency,
            billing_frequency: draft.billing_frequency,
            last_billing_date: draft.last_billing_date,
            created_at: now.to_rfc3339(),
        };

        self.subscription_repository
            .store_subscription(user_id, &subscription)
            .await?;

        info!("Created subscription {} with ID: {}", subscription.service_name, subscription.id);

        Ok(CreateSubscriptionResult {
            subscription,
            success_message: "Subscription added successfully".to_string(),
        })
    }

    /// List a user's stored subscriptions in insertion order
    pub async fn list_subscriptions(&self, user_id: &str) -> ServiceResult<Vec<Subscription>> {
        let records = self
            .subscription_repository
            .list_subscription_records(user_id)
            .await?;

        let mut subscriptions = Vec::with_capacity(records.len());
        for record in records {
            match Subscription::try_from(record) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(invalid) => warn!("Skipping {}", invalid),
            }
        }

        info!("Found {} subscriptions for user {}", subscriptions.len(), user_id);
        Ok(subscriptions)
    }

    /// Project a user's subscriptions against `now`
    pub async fn get_dashboard(&self, user_id: &str, now: DateTime<Utc>) -> ServiceResult<Dashboard> {
        let records = self
            .subscription_repository
            .list_subscription_records(user_id)
            .await?;

        let dashboard = build_dashboard(records, now);
        for invalid in &dashboard.rejected {
            warn!("Excluded from dashboard for user {}: {}", user_id, invalid);
        }

        info!(
            "Dashboard for user {} as of {}: {} projected, {} rejected",
            user_id,
            dashboard.as_of,
            dashboard.subscriptions.len(),
            dashboard.rejected.len()
        );
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::subscription::InvalidRecordReason;
    use crate::storage::csv::connection::SUBSCRIPTIONS_HEADER;
    use crate::storage::csv::CsvConnection;
    use chrono::{NaiveDate, TimeZone};
    use shared::{BillingFrequency, Currency};
    use std::fs;
    use tempfile::TempDir;

    fn setup_test() -> (SubscriptionService, CsvConnection, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        let service = SubscriptionService::new(SubscriptionRepository::new(connection.clone()));
        (service, connection, temp_dir)
    }

    fn command(name: &str, amount: f64, currency: &str, frequency: &str, last: &str) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            service_name: name.to_string(),
            billing_amount: amount,
            currency: currency.to_string(),
            billing_frequency: frequency.to_string(),
            last_billing_date: last.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_subscription_success() {
        let (service, _connection, _temp_dir) = setup_test();

        let result = service
            .create_subscription("user::1", command("  Netflix ", 4400.0, "NGN", "Monthly", "2024-11-05"))
            .await
            .unwrap();

        assert_eq!(result.success_message, "Subscription added successfully");
        assert_eq!(result.subscription.service_name, "Netflix");
        assert_eq!(result.subscription.currency, Currency::Ngn);
        assert_eq!(result.subscription.billing_frequency, BillingFrequency::Monthly);
        assert_eq!(
            result.subscription.last_billing_date,
            NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()
        );

        let listed = service.list_subscriptions("user::1").await.unwrap();
        assert_eq!(listed, vec![result.subscription]);
    }

    #[tokio::test]
    async fn test_create_subscription_validation_errors() {
        let (service, _connection, _temp_dir) = setup_test();

        let result = service
            .create_subscription("user::1", command("", -1.0, "EUR", "Weekly", "yesterday"))
            .await;

        match result {
            Err(ServiceError::Validation(errors)) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation error, got {:?}", other.map(|r| r.subscription.id)),
        }
        assert!(service.list_subscriptions("user::1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quick_creates_get_distinct_ids() {
        let (service, _connection, _temp_dir) = setup_test();
        for name in ["Netflix", "Spotify", "iCloud"] {
            service
                .create_subscription("user::1", command(name, 5.0, "USD", "Monthly", "2024-01-01"))
                .await
                .unwrap();
        }

        let listed = service.list_subscriptions("user::1").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(names, vec!["Netflix", "Spotify", "iCloud"]);
        let ids: HashSet<&str> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_orders_by_next_charge_and_totals() {
        let (service, _connection, _temp_dir) = setup_test();
        service
            .create_subscription("user::1", command("Gym", 15000.0, "NGN", "Yearly", "2024-03-01"))
            .await
            .unwrap();
        service
            .create_subscription("user::1", command("Netflix", 4400.0, "NGN", "Monthly", "2024-11-05"))
            .await
            .unwrap();
        service
            .create_subscription("user::1", command("Spotify", 5.99, "USD", "Monthly", "2024-11-20"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 12, 1, 9, 30, 0).unwrap();
        let dashboard = service.get_dashboard("user::1", now).await.unwrap();

        assert_eq!(dashboard.as_of, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        let names: Vec<&str> = dashboard
            .subscriptions
            .iter()
            .map(|p| p.subscription.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["Netflix", "Spotify", "Gym"]);

        let days: Vec<i64> = dashboard.subscriptions.iter().map(|p| p.days_remaining).collect();
        assert_eq!(days, vec![4, 19, 90]);
        assert!(dashboard.subscriptions[0].is_due_soon());
        assert!(!dashboard.subscriptions[1].is_due_soon());

        assert_eq!(dashboard.summary.count_total, 3);
        assert_eq!(dashboard.summary.totals_by_currency.get(&Currency::Ngn), Some(&19400.0));
        assert_eq!(dashboard.summary.totals_by_currency.get(&Currency::Usd), Some(&5.99));
        assert!(dashboard.rejected.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_reports_damaged_rows() {
        let (service, connection, _temp_dir) = setup_test();
        let path = connection.ensure_subscriptions_file_exists("user::1").unwrap();
        fs::write(
            &path,
            format!(
                "{}subscription::1,Netflix,2200,NGN,Monthly,2024-11-05,2024-11-05T00:00:00+00:00\n\
                 subscription::2,Gym,1000,NGN,Weekly,2024-11-01,2024-11-01T00:00:00+00:00\n",
                SUBSCRIPTIONS_HEADER
            ),
        )
        .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        let dashboard = service.get_dashboard("user::1", now).await.unwrap();

        assert_eq!(dashboard.subscriptions.len(), 1);
        assert_eq!(dashboard.summary.count_total, 1);
        assert_eq!(dashboard.rejected.len(), 1);
        assert_eq!(dashboard.rejected[0].id, "subscription::2");
        assert_eq!(
            dashboard.rejected[0].reason,
            InvalidRecordReason::UnknownFrequency("Weekly".to_string())
        );

        assert_eq!(service.list_subscriptions("user::1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_for_user_without_subscriptions_is_empty() {
        let (service, _connection, _temp_dir) = setup_test();
        let dashboard = service.get_dashboard("user::9", Utc::now()).await.unwrap();
        assert!(dashboard.subscriptions.is_empty());
        assert_eq!(dashboard.summary.count_total, 0);
        assert!(dashboard.summary.totals_by_currency.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_creates_all_succeed_with_unique_ids() {
        let (service, _connection, _temp_dir) = setup_test();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_subscription(
                            "user::1",
                            command(&format!("Service {}", i), 1.0, "USD", "Monthly", "2024-01-01"),
                        )
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = service.list_subscriptions("user::1").await.unwrap();
        assert_eq!(listed.len(), 16);
        let ids: HashSet<&str> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 16);
    }
}
