//! Runtime configuration.
//!
//! Settings come from a TOML file, falling back to defaults for anything the
//! file leaves out. The lookup order is an explicit path, then
//! `$XDG_CONFIG_HOME/relay/config.toml`, then built-in defaults.
//! `OPENWEATHER_API_KEY` in the environment overrides the configured key.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Environment variable holding the OpenWeatherMap API key.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Settings for the pipeline and its providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Provider attempts per step, at least 1
    pub max_retries: u32,
    /// Base retry delay; the wait after attempt k is k times this
    pub retry_delay_ms: u64,
    /// Pause between consecutive steps
    pub pacing_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
    pub github_api_base: String,
    pub geocoding_api_base: String,
    pub weather_api_base: String,
    pub openweather_api_base: String,
    pub openweather_api_key: Option<String>,
    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1000,
            pacing_delay_ms: 500,
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            cache_capacity: 1024,
            github_api_base: "https://api.github.com".to_string(),
            geocoding_api_base: "https://geocoding-api.open-meteo.com/v1".to_string(),
            weather_api_base: "https://api.open-meteo.com/v1".to_string(),
            openweather_api_base: "https://api.openweathermap.org".to_string(),
            openweather_api_key: None,
            user_agent: format!("relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RelayConfig {
    /// Loads configuration from `path`, or from the XDG config directory
    /// when no path is given, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::FileSystem` if an explicit path cannot be read,
    /// `RelayError::Configuration` if the file is not valid TOML, and
    /// `RelayError::InvalidInput` if a value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(key) = std::env::var(OPENWEATHER_KEY_ENV) {
            if !key.trim().is_empty() {
                config.openweather_api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| RelayError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| RelayError::configuration(format!("Invalid configuration file: {e}")))
    }

    /// Existing config file under `$XDG_CONFIG_HOME/relay`, if any.
    fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("relay").find_config_file("config.toml")
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(RelayError::invalid_input("max_retries").with_reason("must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(RelayError::invalid_input("request_timeout_secs")
                .with_reason("must be at least 1 second"));
        }
        for (field, value) in [
            ("github_api_base", &self.github_api_base),
            ("geocoding_api_base", &self.geocoding_api_base),
            ("weather_api_base", &self.weather_api_base),
            ("openweather_api_base", &self.openweather_api_base),
        ] {
            if value.trim().is_empty() {
                return Err(RelayError::invalid_input(field).with_reason("cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = RelayConfig::from_toml(
            r#"
            max_retries = 5
            github_api_base = "http://127.0.0.1:9000"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.github_api_base, "http://127.0.0.1:9000");
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.pacing_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_toml_is_a_configuration_error() {
        let err = RelayConfig::from_toml("max_retries = \"many\"").unwrap_err();
        assert!(matches!(err, RelayError::Configuration { .. }));
    }

    #[test]
    fn test_validate_rejects_zero_retries_and_empty_urls() {
        let config = RelayConfig {
            max_retries: 0,
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RelayConfig {
            weather_api_base: " ".to_string(),
            ..RelayConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weather_api_base"));

        assert!(RelayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "retry_delay_ms = 0\npacing_delay_ms = 0").expect("write config");

        let config = RelayConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.retry_delay(), Duration::ZERO);
        assert_eq!(config.pacing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = RelayConfig::from_file(Path::new("/nonexistent/relay.toml")).unwrap_err();
        assert!(matches!(err, RelayError::FileSystem { .. }));
    }
}
