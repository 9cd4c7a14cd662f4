pub mod app_config;
pub mod loader;

// Re-export commonly used types
pub use app_config::{AppConfig, DemoConfig};
pub use loader::ConfigLoader;

pub use app_config::{
    CONFIG_FILE_NAME, DEFAULT_MESSAGE, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MESSAGE, USER_CONFIG_PATH,
};
