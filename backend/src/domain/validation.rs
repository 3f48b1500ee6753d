//! Form validation for the sign-up, log-in and add-subscription forms.
//!
//! Validation is a pure function of the submitted values. Results are plain
//! `FormValidation` data; clearing messages after a delay or highlighting
//! fields is left to whichever client renders them.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{BillingFrequency, Currency, FieldError, FormValidation};

use crate::domain::commands::account::{LogInCommand, SignUpCommand};
use crate::domain::commands::subscriptions::CreateSubscriptionCommand;
use crate::domain::models::subscription::DATE_FORMAT;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid username regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";
pub const MAX_SERVICE_NAME_LENGTH: usize = 100;

pub fn validate_username(username: &str) -> Option<FieldError> {
    if !USERNAME_RE.is_match(username) {
        return Some(FieldError::new("username", "Username can only contain alphanumeric characters"));
    }
    None
}

pub fn validate_email(email: &str) -> Option<FieldError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Some(FieldError::new("email", "Please enter a valid email address"));
    }
    None
}

/// At least 8 characters drawn from letters, digits and `!@#$%^&*`, with at
/// least one lowercase letter, uppercase letter, digit and special character.
pub fn validate_password(password: &str) -> Option<FieldError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(c);

    let valid = password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if !valid {
        return Some(FieldError::new("password", "Please enter a valid password"));
    }
    None
}

pub fn validate_sign_up(command: &SignUpCommand) -> FormValidation {
    let errors = [
        validate_username(&command.username),
        validate_email(&command.email),
        validate_password(&command.password),
    ]
    .into_iter()
    .flatten()
    .collect();

    FormValidation::from_errors(errors)
}

/// Checks presence and email shape; credentials are verified by the account service.
pub fn validate_log_in(command: &LogInCommand) -> FormValidation {
    let mut errors = Vec::new();
    if command.email.trim().is_empty() {
        errors.push(FieldError::new("email", "Please enter your email address"));
    } else if let Some(error) = validate_email(&command.email) {
        errors.push(error);
    }
    if command.password.is_empty() {
        errors.push(FieldError::new("password", "Please enter your password"));
    }
    FormValidation::from_errors(errors)
}

/// Typed values of a valid add-subscription form
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDraft {
    pub service_name: String,
    pub billing_amount: f64,
    pub currency: Currency,
    pub billing_frequency: BillingFrequency,
    pub last_billing_date: NaiveDate,
}

pub fn parse_subscription_form(command: &CreateSubscriptionCommand) -> Result<SubscriptionDraft, FormValidation> {
    let mut errors = Vec::new();

    let service_name = command.service_name.trim();
    if service_name.is_empty() {
        errors.push(FieldError::new("service_name", "Please enter the service name"));
    } else if service_name.chars().count() > MAX_SERVICE_NAME_LENGTH {
        errors.push(FieldError::new(
            "service_name",
            format!("Service name cannot exceed {} characters", MAX_SERVICE_NAME_LENGTH),
        ));
    }

    if !command.billing_amount.is_finite() || command.billing_amount < 0.0 {
        errors.push(FieldError::new("billing_amount", "Amount must be zero or more"));
    }

    let currency = command
        .currency
        .parse::<Currency>()
        .map_err(|e| errors.push(FieldError::new("currency", e)))
        .ok();

    let billing_frequency = command
        .billing_frequency
        .parse::<BillingFrequency>()
        .map_err(|e| errors.push(FieldError::new("billing_frequency", e)))
        .ok();

    let last_billing_date = NaiveDate::parse_from_str(command.last_billing_date.trim(), DATE_FORMAT)
        .map_err(|_| {
            errors.push(FieldError::new(
                "last_billing_date",
                "Last billing date must be a valid date (YYYY-MM-DD)",
            ))
        })
        .ok();

    match (currency, billing_frequency, last_billing_date) {
        (Some(currency), Some(billing_frequency), Some(last_billing_date)) if errors.is_empty() => {
            Ok(SubscriptionDraft {
                service_name: service_name.to_string(),
                billing_amount: command.billing_amount,
                currency,
                billing_frequency,
                last_billing_date,
            })
        }
        _ => Err(FormValidation::from_errors(errors)),
    }
}
