//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod account {
    use crate::domain::models::user::User;

    /// Input for creating an account.
    #[derive(Debug, Clone)]
    pub struct SignUpCommand {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    /// Input for logging in.
    #[derive(Debug, Clone)]
    pub struct LogInCommand {
        pub email: String,
        pub password: String,
    }

    /// Result of a successful sign-up.
    #[derive(Debug, Clone)]
    pub struct SignUpResult {
        pub user: User,
        pub success_message: String,
    }

    /// Result of a successful log-in.
    #[derive(Debug, Clone)]
    pub struct LogInResult {
        pub token: String,
        pub user: User,
    }
}

pub mod subscriptions {
    use crate::domain::models::subscription::Subscription;

    /// Input for adding a subscription. Fields arrive unvalidated.
    #[derive(Debug, Clone)]
    pub struct CreateSubscriptionCommand {
        pub service_name: String,
        pub billing_amount: f64,
        pub currency: String,
        pub billing_frequency: String,
        pub last_billing_date: String,
    }

    /// Result of adding a subscription.
    #[derive(Debug, Clone)]
    pub struct CreateSubscriptionResult {
        pub subscription: Subscription,
        pub success_message: String,
    }
}
