//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::subscription::{Subscription, SubscriptionRecord};
use crate::domain::models::user::User;

/// Trait defining the interface for subscription storage operations
///
/// Records are returned in their raw stored form so that a damaged row can be
/// reported by the domain layer instead of failing the whole read.
#[async_trait]
pub trait SubscriptionStorage: Send + Sync {
    /// Append a new subscription for a user
    async fn store_subscription(&self, user_id: &str, subscription: &Subscription) -> Result<()>;

    /// List a user's subscription rows in insertion order
    async fn list_subscription_records(&self, user_id: &str) -> Result<Vec<SubscriptionRecord>>;
}

/// Trait defining the interface for user account storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user
    async fn store_user(&self, user: &User) -> Result<()>;

    /// Retrieve a user by ID
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Retrieve a user by (normalized) email address
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
