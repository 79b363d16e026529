//! Configuration module with per-concern sub-modules
//!
//! - `auth` - access key for the inbound API
//! - `database` - message store connection pool
//! - `gateway` - SMS gateway credentials and HTTP limits
//! - `logging` - log level and format
//! - `scheduler` - reconciliation job schedule and batch sizes
//! - `server` - HTTP bind address

pub mod auth;
pub mod database;
pub mod gateway;
pub mod logging;
pub mod scheduler;
pub mod server;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::AccessConfig;
pub use database::DatabaseConfig;
pub use gateway::{GatewayConfig, GatewayItemConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use scheduler::{SchedulerConfig, SchedulerJobConfig, SMS_JOB_NAME};
pub use server::ServerConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Prefix for environment overrides, e.g. `RELAY__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "RELAY";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub setting: AccessConfig,

    #[serde(default)]
    pub sms: GatewayConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from the file named by `RELAY_CONFIG` (or the
    /// default path) layered under `RELAY__*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    /// Load configuration from `path` (optional) plus environment overrides
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the relay cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port must be non-zero"));
        }
        if self.scheduler.dispatch_limit == 0 || self.scheduler.reconcile_limit == 0 {
            return Err(ConfigError::invalid(
                "scheduler limits must be greater than zero",
            ));
        }
        if self.scheduler.batch_threshold == 0 {
            return Err(ConfigError::invalid(
                "scheduler.batch_threshold must be greater than zero",
            ));
        }
        if let Some(job) = self
            .scheduler
            .items
            .iter()
            .find(|job| job.expression.trim().is_empty())
        {
            return Err(ConfigError::invalid(format!(
                "scheduler job '{}' has an empty expression",
                job.name
            )));
        }
        Ok(())
    }
}
