use crate::infrastructure::LocatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Service locator error: {0}")]
    Locator(#[from] LocatorError),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// 示例服务的错误，底层错误作为 source 保留
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Logging failed.")]
    Logging(#[source] std::io::Error),
    #[error("Failed to load data.")]
    DataAccess(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },
}
