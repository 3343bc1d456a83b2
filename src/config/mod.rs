//! Application configuration module
//!
//! Configuration is loaded from environment variables with the
//! `TUTOR_CHAT` prefix; nested values are separated by `__`.
//!
//! # Example
//!
//! ```no_run
//! use tutor_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod messaging;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use messaging::MessagingConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Message windows, page sizes and connection buffers
    #[serde(default)]
    pub messaging: MessagingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `TUTOR_CHAT__*` variables:
    ///
    /// - `TUTOR_CHAT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TUTOR_CHAT__DATABASE__URL=...` -> `database.url = ...`
    /// - `TUTOR_CHAT__MESSAGING__LIVE_WINDOW=100` -> `messaging.live_window = 100`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TUTOR_CHAT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.messaging.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("TUTOR_CHAT__DATABASE__URL", "postgresql://test@localhost/chat");
    }

    fn clear_env() {
        env::remove_var("TUTOR_CHAT__DATABASE__URL");
        env::remove_var("TUTOR_CHAT__SERVER__PORT");
        env::remove_var("TUTOR_CHAT__SERVER__LOG_FORMAT");
        env::remove_var("TUTOR_CHAT__MESSAGING__LIVE_WINDOW");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/chat");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.messaging.live_window, 50);
        assert!(!config.is_production());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TUTOR_CHAT__SERVER__PORT", "3000");
        env::set_var("TUTOR_CHAT__SERVER__LOG_FORMAT", "json");
        env::set_var("TUTOR_CHAT__MESSAGING__LIVE_WINDOW", "20");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.messaging.live_window, 20);
    }

    #[test]
    fn test_missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
