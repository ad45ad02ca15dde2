//! # Kickoff API
//!
//! HTTP surface of the field booking service: field profiles, calendars,
//! pricing, cancellation policies and the booking workflow.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths, one router per resource, merged in [`router`]
//! - **Handlers**: extract the request, call a service, wrap the result
//! - **Services**: authorization and orchestration of the core rules against
//!   the [`Store`]
//! - **Middleware**: caller identity and error-to-HTTP mapping
//! - **Config**: environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity extraction and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Business operations shared by the handlers
pub mod services;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use kickoff_core::collaborators::{Notifier, TeamDirectory};
use kickoff_db::{PgStore, Store};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::services::notifications::TracingNotifier;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Persistence for fields, calendars, rules, policies and bookings
    pub store: Arc<dyn Store>,
    /// Team membership, owned by the team service
    pub teams: Arc<dyn TeamDirectory>,
    /// Outbound notifications, best-effort
    pub notifier: Arc<dyn Notifier>,
    /// Longest calendar range served in one request, in days
    pub calendar_max_days: i64,
}

/// Builds the application router with all routes attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Field profile, pricing and cancellation policy endpoints
        .merge(routes::fields::routes())
        // Calendar endpoints
        .merge(routes::calendar::routes())
        // Booking workflow endpoints
        .merge(routes::bookings::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = kickoff_api::config::ApiConfig::from_env()?;
/// let db_pool = kickoff_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// kickoff_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // PostgreSQL backs both the store and team membership lookups
    let store = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState {
        store: store.clone(),
        teams: store,
        notifier: Arc::new(TracingNotifier),
        calendar_max_days: config.calendar_max_days,
    });

    let app = router(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<axum::http::HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
                axum::http::HeaderName::from_static(middleware::auth::USER_ID_HEADER),
                axum::http::HeaderName::from_static(middleware::auth::USER_ROLE_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(|_: tower::BoxError| async {
                axum::http::StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(std::time::Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
