//! # Sub-Minder Backend
//!
//! Contains all non-UI logic for the subscription tracker.
//!
//! The backend brings together:
//! - **Domain**: billing projection, form validation, accounts and subscriptions
//! - **Storage**: per-user YAML and CSV files under the data directory
//! - **IO**: the REST API consumed by the web client
//!
//! ## Architecture
//!
//! ```text
//! Web client
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (CSV / YAML files)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use log::info;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domain::{AccountService, SubscriptionService};
use crate::storage::{CsvConnection, SubscriptionRepository, UserRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub subscription_service: SubscriptionService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up storage in {}", config.data_dir.display());
    let connection = CsvConnection::new(&config.data_dir)?;

    info!("Setting up domain model");
    let account_service = AccountService::new(UserRepository::new(connection.clone()));
    let subscription_service = SubscriptionService::new(SubscriptionRepository::new(connection));

    Ok(AppState {
        account_service,
        subscription_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin: {}", config.allowed_origin))?;

    // CORS setup to allow the web client to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/health", get(io::health))
        .route("/auth/signup", post(io::sign_up))
        .route("/auth/login", post(io::log_in))
        .route("/auth/logout", post(io::log_out))
        .route(
            "/subscriptions",
            get(io::list_subscriptions).post(io::create_subscription),
        )
        .route("/dashboard", get(io::get_dashboard));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
