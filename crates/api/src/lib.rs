//! # Clinic API
//!
//! The API crate provides the web server for the clinic booking backend.
//! It exposes endpoints for time slots, test bookings, patients, the
//! consultation and lab test catalog, and dashboard statistics.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Middleware**: Error mapping shared by all handlers
//! - **Config**: Handle environment and application configuration
//!
//! Business rules live in `clinic-core` services; handlers only reach the
//! store through them.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use clinic_core::{
    schedule::SlotSchedule,
    services::{
        booking::BookingService, catalog::CatalogService, patients::PatientService,
        slots::SlotService,
    },
    store::ClinicStore,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use clinic_api::{ApiState, build_router};
/// use clinic_core::schedule::SlotSchedule;
/// use clinic_db::InMemoryStore;
///
/// let state = ApiState::new(Arc::new(InMemoryStore::new()), SlotSchedule::default());
/// let app = build_router(state);
/// ```
pub struct ApiState {
    /// Persistence backend shared by all services
    pub store: Arc<dyn ClinicStore>,
    /// Daily slot template used for generation
    pub schedule: SlotSchedule,
}

impl ApiState {
    pub fn new(store: Arc<dyn ClinicStore>, schedule: SlotSchedule) -> Self {
        Self { store, schedule }
    }

    pub fn slots(&self) -> SlotService<dyn ClinicStore> {
        SlotService::new(Arc::clone(&self.store), self.schedule.clone())
    }

    pub fn bookings(&self) -> BookingService<dyn ClinicStore> {
        BookingService::new(Arc::clone(&self.store), self.schedule.clone())
    }

    pub fn patients(&self) -> PatientService<dyn ClinicStore> {
        PatientService::new(Arc::clone(&self.store))
    }

    pub fn catalog(&self) -> CatalogService<dyn ClinicStore> {
        CatalogService::new(Arc::clone(&self.store))
    }
}

/// Builds the application router with every endpoint and request tracing.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot listing and generation
        .merge(routes::slots::routes())
        // Test bookings
        .merge(routes::booking::routes())
        // Patient records
        .merge(routes::patients::routes())
        // Consultations and lab tests
        .merge(routes::catalog::routes())
        // Summary counts
        .merge(routes::dashboard::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Unhandled error: {}", err))
    }
}

/// Starts the API server with the provided configuration and store
///
/// Initializes logging, wires the routes, applies CORS and the request
/// timeout, then serves until the listener fails.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use clinic_api::{config::ApiConfig, start_server};
/// use clinic_db::{PgStore, create_pool};
///
/// async fn run() -> eyre::Result<()> {
///     let config = ApiConfig::from_env()?;
///     let pool = create_pool(&config.database_url).await?;
///     start_server(config, Arc::new(PgStore::new(pool))).await
/// }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ClinicStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = ApiState::new(store, config.schedule.clone());
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
