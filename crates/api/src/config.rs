//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the clinic API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//!
//! The slot template is read by [`schedule_from_env`]:
//!
//! - `CLINIC_SLOT_WINDOWS`: Daily windows, e.g. "08:00-09:00,09:00-10:00"
//! - `CLINIC_SLOT_CAPACITY`: Patients per slot, or "unlimited" (default: 10)
//! - `CLINIC_CLOSED_DAYS`: Comma-separated weekdays the clinic is closed (default: "sun")
//! - `CLINIC_SLOT_HORIZON_DAYS`: Days covered by bulk generation (default: 30)

use clinic_core::schedule::SlotSchedule;
use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the clinic API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use clinic_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Daily slot template
    pub schedule: SlotSchedule,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - Any of the `CLINIC_*` schedule variables is malformed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let schedule = schedule_from_env()?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            schedule,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Builds the slot template from `CLINIC_*` variables, falling back to the
/// clinic's standard schedule for anything unset.
pub fn schedule_from_env() -> Result<SlotSchedule> {
    schedule_from_lookup(|key| env::var(key).ok())
}

/// Same as [`schedule_from_env`] with an injectable variable source.
pub fn schedule_from_lookup<F>(lookup: F) -> Result<SlotSchedule>
where
    F: Fn(&str) -> Option<String>,
{
    let mut schedule = SlotSchedule::default();

    if let Some(windows) = lookup("CLINIC_SLOT_WINDOWS") {
        schedule.windows = SlotSchedule::parse_windows(&windows)
            .wrap_err("Invalid CLINIC_SLOT_WINDOWS value")?;
    }

    if let Some(capacity) = lookup("CLINIC_SLOT_CAPACITY") {
        schedule.capacity = SlotSchedule::parse_capacity(&capacity)
            .wrap_err("Invalid CLINIC_SLOT_CAPACITY value")?;
    }

    if let Some(days) = lookup("CLINIC_CLOSED_DAYS") {
        schedule.closed_days = SlotSchedule::parse_closed_days(&days)
            .wrap_err("Invalid CLINIC_CLOSED_DAYS value")?;
    }

    if let Some(horizon) = lookup("CLINIC_SLOT_HORIZON_DAYS") {
        schedule.horizon_days = horizon
            .trim()
            .parse()
            .wrap_err("Invalid CLINIC_SLOT_HORIZON_DAYS value")?;
    }

    Ok(schedule)
}
