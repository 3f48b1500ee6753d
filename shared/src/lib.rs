use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How often a subscription charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingFrequency {
    Monthly,
    Yearly,
}

impl BillingFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingFrequency::Monthly => "Monthly",
            BillingFrequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingFrequency {
    type Err = String;

    /// Accepts the canonical names case-insensitively ("Monthly", "yearly", ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingFrequency::Monthly),
            "yearly" => Ok(BillingFrequency::Yearly),
            other => Err(format!("unknown billing frequency '{}'", other)),
        }
    }
}

/// Currency a subscription is billed in. Amounts are never converted between currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Nigerian naira
    #[serde(rename = "NGN")]
    Ngn,
    /// US dollar
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ngn => "NGN",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Ngn => "₦",
            Currency::Usd => "$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Currency::Ngn),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("unsupported currency '{}'", other)),
        }
    }
}

/// Subscription ID in format: "subscription::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    /// Display name of the service (e.g. "Netflix")
    pub service_name: String,
    /// Amount charged per billing period
    pub billing_amount: f64,
    pub currency: Currency,
    pub billing_frequency: BillingFrequency,
    /// Date of the most recent charge (YYYY-MM-DD)
    pub last_billing_date: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// A subscription together with its derived billing projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSubscription {
    #[serde(flatten)]
    pub subscription: Subscription,
    /// Last billing date advanced by one period (YYYY-MM-DD)
    pub next_billing_date: String,
    /// Days from the evaluation date until the next charge; negative when overdue
    pub days_remaining: i64,
    /// Evaluation date plus `days_remaining` (YYYY-MM-DD)
    pub display_date: String,
    /// True when `days_remaining` is within the due-soon threshold
    pub due_soon: bool,
}

/// Aggregate figures for the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSummary {
    pub count_total: usize,
    /// Sum of billing amounts per currency. Currencies without records are absent.
    pub totals_by_currency: BTreeMap<Currency, f64>,
}

/// A stored record the dashboard could not project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub id: String,
    pub reason: String,
}

/// Query parameters for the dashboard endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Evaluation date override (YYYY-MM-DD); defaults to today (UTC)
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Date the projection was evaluated against (YYYY-MM-DD)
    pub as_of: String,
    /// Subscriptions ordered by next billing date, soonest first
    pub subscriptions: Vec<ProjectedSubscription>,
    pub summary: SubscriptionSummary,
    pub rejected: Vec<RejectedRecord>,
}

/// Request for adding a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub billing_amount: f64,
    /// Currency code ("NGN" or "USD")
    pub currency: String,
    /// "Monthly" or "Yearly"
    pub billing_frequency: String,
    /// YYYY-MM-DD
    pub last_billing_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubscriptionResponse {
    pub subscription: Subscription,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<Subscription>,
}

/// Public view of a user account (never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID in format: "user::epoch_millis"
    pub id: String,
    pub username: String,
    pub email: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user: UserProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    pub user: UserProfile,
}

/// A single failed form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validation result for form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl FormValidation {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Message for the first failing field, if any
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// Body of every non-2xx API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}
