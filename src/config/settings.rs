//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// External access-control service
    pub access: AccessSettings,

    /// Admission gate (token bucket) configuration
    pub admission: AdmissionSettings,

    /// Per-request deadline configuration
    pub deadline: DeadlineSettings,

    /// Room hub configuration
    pub hub: HubSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Access-control service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessSettings {
    /// Base URL of the authorization service
    pub url: String,

    /// Request timeout for access checks in milliseconds
    pub timeout_ms: u64,
}

/// Admission gate configuration.
///
/// The gate admits at most `capacity` requests per refill interval; excess
/// requests are rejected immediately rather than queued.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionSettings {
    /// Token bucket capacity
    pub capacity: u32,

    /// Refill interval in milliseconds
    pub refill_interval_ms: u64,
}

/// Per-request deadline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeadlineSettings {
    /// Maximum wall-clock budget for one unary request in milliseconds
    pub request_timeout_ms: u64,
}

/// Room hub configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    /// Bounded mailbox capacity per room
    pub mailbox_capacity: usize,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("access.timeout_ms", 2000)?
            .set_default("admission.capacity", 100)?
            .set_default("admission.refill_interval_ms", 1000)?
            .set_default("deadline.request_timeout_ms", 5000)?
            .set_default("hub.mailbox_capacity", 100)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("access.url", std::env::var("ACCESS_SERVICE_URL").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.admission.capacity == 0 {
            return Err(ConfigError::Message(
                "admission.capacity must be greater than zero".into(),
            ));
        }
        if self.admission.refill_interval_ms == 0 {
            return Err(ConfigError::Message(
                "admission.refill_interval_ms must be greater than zero".into(),
            ));
        }
        if self.deadline.request_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "deadline.request_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.hub.mailbox_capacity == 0 {
            return Err(ConfigError::Message(
                "hub.mailbox_capacity must be greater than zero".into(),
            ));
        }
        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
