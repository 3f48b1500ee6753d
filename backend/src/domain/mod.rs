//! # Domain Module
//!
//! Contains the core business logic for Sub-Minder.
//!
//! The domain layer knows nothing about HTTP or file formats. It receives
//! commands, validates them, talks to storage through the traits in
//! `crate::storage`, and returns domain models that the REST layer maps to
//! the shared DTOs.
//!
//! ## Key Components
//!
//! - **Billing projector**: next-charge dates, days remaining, urgency
//!   ordering and per-currency totals
//! - **Validation**: field rules for the sign-up, log-in and subscription forms
//! - **Services**: account sessions and per-user subscription management

pub mod account_service;
pub mod billing_projector;
pub mod commands;
pub mod errors;
pub mod models;
pub mod subscription_service;
pub mod validation;

pub use account_service::AccountService;
pub use errors::{ServiceError, ServiceResult};
pub use subscription_service::SubscriptionService;
