//! Library configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `POLEMIC` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use polemic::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod engine;
mod error;

pub use ai::AiConfig;
pub use engine::EngineTuning;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root configuration
///
/// Contains all configuration sections for a process embedding the engine.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Generation-service configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Orchestration tuning
    #[serde(default)]
    pub engine: EngineTuning,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `POLEMIC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `POLEMIC__AI__API_KEY=sk-...` -> `ai.api_key = sk-...`
    /// - `POLEMIC__ENGINE__WEIGHT_BASE=4` -> `engine.weight_base = 4`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("POLEMIC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("POLEMIC__AI__API_KEY", "sk-test");
    }

    fn clear_env() {
        env::remove_var("POLEMIC__AI__API_KEY");
        env::remove_var("POLEMIC__AI__MODEL");
        env::remove_var("POLEMIC__ENGINE__WEIGHT_BASE");
        env::remove_var("POLEMIC__ENGINE__GATE_THRESHOLD");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply_without_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.model, "gpt-3.5-turbo-1106");
        assert_eq!(config.engine.weight_base, 4.0);
        assert_eq!(config.engine.gate_threshold, 7.0);
    }

    #[test]
    fn test_custom_tuning_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("POLEMIC__ENGINE__WEIGHT_BASE", "6");
        env::set_var("POLEMIC__ENGINE__GATE_THRESHOLD", "4.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.weight_base, 6.0);
        assert_eq!(config.engine.gate_threshold, 4.5);
    }
}
