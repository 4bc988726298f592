//! Runtime configuration: where to send requests, which catalog to validate
//! against, and how to read the response.

use crate::parser::series_parser::ParserOptions;
use crate::transport::loader::DEFAULT_ENDPOINT;
use crate::types::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything [`crate::WeatherMachine`] needs besides a cache directory.
///
/// Every field is optional in JSON; missing fields take the LANL defaults.
///
/// ```
/// use weathermachine::WeatherMachineConfig;
///
/// let config: WeatherMachineConfig =
///     serde_json::from_str(r#"{ "parser": { "strict_width": true } }"#).unwrap();
/// assert!(config.parser.strict_width);
/// assert_eq!(config.parser.missing_marker, "*");
/// assert!(config.catalog.contains_variable("spd1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherMachineConfig {
    pub endpoint: String,
    pub catalog: Catalog,
    pub parser: ParserOptions,
}

impl Default for WeatherMachineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            catalog: Catalog::default(),
            parser: ParserOptions::default(),
        }
    }
}

impl WeatherMachineConfig {
    /// Reads and validates a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would corrupt parsed values instead of failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = self.parser.temperature_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "parser.temperature_scale must be a positive number, got {scale}"
            )));
        }
        if self.parser.temperature_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "parser.temperature_prefix must not be empty".to_string(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}
