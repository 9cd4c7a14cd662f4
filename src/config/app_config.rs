use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::loader::ConfigLoader;
use crate::errors::ConfigError;
use crate::logging::{parse_level, LoggingConfig, LoggingEnvironment};

// Configuration location constants
pub const USER_CONFIG_PATH: &str = "~/.config/service-locator";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Environment overrides
pub const ENV_LOG_LEVEL: &str = "SERVICE_LOCATOR_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "SERVICE_LOCATOR_LOG_FORMAT";
pub const ENV_MESSAGE: &str = "SERVICE_LOCATOR_MESSAGE";

pub const DEFAULT_MESSAGE: &str = "This is a log message.";

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

/// Settings for the demo commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Message written through the resolved logger
    pub message: String,
    /// Records served by the in-memory data access service
    pub records: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            records: vec!["customers".to_string(), "orders".to_string()],
        }
    }
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    logging: Option<PartialLoggingConfig>,
    demo: Option<PartialDemoConfig>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialLoggingConfig {
    environment: Option<String>,
    level: Option<String>,
    format: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialDemoConfig {
    message: Option<String>,
    records: Option<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config()
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        ConfigLoader::with_file(path).load_config()
    }

    /// Create AppConfig from partial config and environment
    ///
    /// Environment values take priority over the file. The logging
    /// environment picks a preset, then level and format override it.
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let logging_partial = partial.logging.unwrap_or_default();
        let demo_partial = partial.demo.unwrap_or_default();

        let mut logging = match logging_partial.environment {
            Some(env) => LoggingConfig::for_environment(env.parse::<LoggingEnvironment>()?),
            None => LoggingConfig::default(),
        };

        if let Some(level) = env_map.get(ENV_LOG_LEVEL).or(logging_partial.level.as_ref()) {
            logging.level = parse_level(level)?;
        }
        if let Some(format) = env_map.get(ENV_LOG_FORMAT).or(logging_partial.format.as_ref()) {
            logging.format = format.parse()?;
        }

        let defaults = DemoConfig::default();
        let demo = DemoConfig {
            message: env_map
                .get(ENV_MESSAGE)
                .cloned()
                .or(demo_partial.message)
                .unwrap_or(defaults.message),
            records: demo_partial.records.unwrap_or(defaults.records),
        };

        Ok(AppConfig { logging, demo })
    }
}
