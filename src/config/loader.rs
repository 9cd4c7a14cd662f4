use std::{collections::HashMap, env, fs, path::PathBuf};

use super::app_config::{
    AppConfig, PartialAppConfig, CONFIG_FILE_NAME, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MESSAGE,
    USER_CONFIG_PATH,
};
use crate::errors::ConfigError;

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
    file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self {
            base_path: None,
            file: None,
        }
    }

    /// Create a config loader with custom base path (for testing)
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
            file: None,
        }
    }

    /// Use an explicit file; unlike the default location it must exist
    pub fn with_file(file: PathBuf) -> Self {
        Self {
            base_path: None,
            file: Some(file),
        }
    }

    /// Load complete application configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let partial = match &self.file {
            Some(file) => Some(self.read_partial(file)?),
            None => {
                let path = self.default_config_path();
                if path.exists() {
                    Some(self.read_partial(&path)?)
                } else {
                    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                    None
                }
            }
        };

        AppConfig::from_partial_and_env(partial, &self.collect_env_vars())
    }

    /// Location of the user configuration file
    pub fn default_config_path(&self) -> PathBuf {
        let base = match &self.base_path {
            // For testing: use custom base path
            Some(base_path) => base_path.join(USER_CONFIG_PATH.trim_start_matches("~/")),
            None => PathBuf::from(shellexpand::tilde(USER_CONFIG_PATH).as_ref()),
        };
        base.join(CONFIG_FILE_NAME)
    }

    fn read_partial(&self, path: &PathBuf) -> Result<PartialAppConfig, ConfigError> {
        let shown = path.to_string_lossy().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(shown.clone(), e))?;
        let partial = toml::from_str(&content).map_err(|e| ConfigError::TomlParse(shown.clone(), e))?;

        tracing::debug!(path = %shown, "Loaded configuration file");
        Ok(partial)
    }

    /// Collect the environment variables that override file values
    fn collect_env_vars(&self) -> HashMap<String, String> {
        [ENV_LOG_LEVEL, ENV_LOG_FORMAT, ENV_MESSAGE]
            .into_iter()
            .filter_map(|name| env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_path(temp_dir.path().to_path_buf());

        let config = loader.load_config().unwrap();

        assert!(!loader.default_config_path().exists());
        assert_eq!(config.demo.records, AppConfig::default().demo.records);
    }

    #[test]
    fn test_reads_file_under_base_path() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_path(temp_dir.path().to_path_buf());
        let path = loader.default_config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[demo]\nrecords = [\"x\", \"y\", \"z\"]\n").unwrap();

        let config = loader.load_config().unwrap();

        assert!(path.ends_with(".config/service-locator/config.toml"));
        assert_eq!(config.demo.records, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let err = ConfigLoader::with_file(missing).load_config().unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_, _)));
    }

    #[test]
    fn test_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[demo\nrecords = 3").unwrap();

        let err = ConfigLoader::with_file(path).load_config().unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_, _)));
    }
}
