//! Domain model for a subscription and the raw row it is stored as.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{BillingFrequency, Currency};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recurring payment with typed fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub billing_amount: f64,
    pub currency: Currency,
    pub billing_frequency: BillingFrequency,
    pub last_billing_date: NaiveDate,
    pub created_at: String, // RFC 3339 timestamp
}

impl Subscription {
    /// Generate a subscription ID based on a timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("subscription::{}", epoch_millis)
    }
}

/// A subscription row exactly as persisted. Every field is text so a damaged
/// row can still be read and reported by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub id: String,
    pub service_name: String,
    pub billing_amount: String,
    pub currency: String,
    pub billing_frequency: String,
    pub last_billing_date: String,
    pub created_at: String,
}

impl From<&Subscription> for SubscriptionRecord {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id.clone(),
            service_name: subscription.service_name.clone(),
            billing_amount: subscription.billing_amount.to_string(),
            currency: subscription.currency.code().to_string(),
            billing_frequency: subscription.billing_frequency.as_str().to_string(),
            last_billing_date: subscription.last_billing_date.format(DATE_FORMAT).to_string(),
            created_at: subscription.created_at.clone(),
        }
    }
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = InvalidRecord;

    fn try_from(record: SubscriptionRecord) -> Result<Self, Self::Error> {
        let invalid = |reason| InvalidRecord {
            id: record.id.clone(),
            reason,
        };

        let last_billing_date = NaiveDate::parse_from_str(record.last_billing_date.trim(), DATE_FORMAT)
            .map_err(|_| invalid(InvalidRecordReason::UnparseableDate(record.last_billing_date.clone())))?;

        // Unknown frequencies are rejected rather than passed through unchanged.
        let billing_frequency = record
            .billing_frequency
            .parse::<BillingFrequency>()
            .map_err(|_| invalid(InvalidRecordReason::UnknownFrequency(record.billing_frequency.clone())))?;

        let currency = record
            .currency
            .parse::<Currency>()
            .map_err(|_| invalid(InvalidRecordReason::UnknownCurrency(record.currency.clone())))?;

        let billing_amount = record
            .billing_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .ok_or_else(|| invalid(InvalidRecordReason::InvalidAmount(record.billing_amount.clone())))?;

        Ok(Subscription {
            id: record.id,
            service_name: record.service_name,
            billing_amount,
            currency,
            billing_frequency,
            last_billing_date,
            created_at: record.created_at,
        })
    }
}

/// A stored subscription that cannot be projected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid subscription record '{id}': {reason}")]
pub struct InvalidRecord {
    pub id: String,
    pub reason: InvalidRecordReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecordReason {
    UnparseableDate(String),
    UnknownFrequency(String),
    UnknownCurrency(String),
    InvalidAmount(String),
}

impl fmt::Display for InvalidRecordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRecordReason::UnparseableDate(value) => {
                write!(f, "last billing date '{}' is not a YYYY-MM-DD date", value)
            }
            InvalidRecordReason::UnknownFrequency(value) => {
                write!(f, "billing frequency '{}' is not Monthly or Yearly", value)
            }
            InvalidRecordReason::UnknownCurrency(value) => {
                write!(f, "currency '{}' is not supported", value)
            }
            InvalidRecordReason::InvalidAmount(value) => {
                write!(f, "billing amount '{}' is not a non-negative number", value)
            }
        }
    }
}

/// A subscription with its derived next charge. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSubscription {
    pub subscription: Subscription,
    pub next_billing_date: NaiveDate,
    pub days_remaining: i64,
    pub display_date: NaiveDate,
}
