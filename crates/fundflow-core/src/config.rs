//! Client configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! [backend]
//! endpoint = "http://localhost:8000/analyze"
//! timeout_secs = 300
//!
//! [client]
//! default_identifier = "120503"
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FundflowError, FundflowResult};
use crate::state::DEFAULT_IDENTIFIER;

/// Default analysis endpoint of the local backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/analyze";

/// The backend runs a three-stage LLM pipeline, so replies take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Client-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub default_identifier: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_identifier: DEFAULT_IDENTIFIER.to_string(),
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundflowConfig {
    pub backend: BackendConfig,
    pub client: ClientConfig,
}

impl FundflowConfig {
    /// Parse and validate configuration from TOML text.
    pub fn parse(text: &str) -> FundflowResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user file is used
    /// when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> FundflowResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => {
                    debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path)?;
        debug!(path = %path.display(), "Loaded configuration");
        Self::parse(&text)
    }

    /// Override the backend endpoint, re-validating the result.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> FundflowResult<Self> {
        self.backend.endpoint = endpoint.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> FundflowResult<()> {
        let url = reqwest::Url::parse(&self.backend.endpoint).map_err(|e| {
            FundflowError::config(format!("invalid endpoint '{}': {e}", self.backend.endpoint))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FundflowError::config(format!(
                "endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(FundflowError::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Per-user configuration file: `<config dir>/fundflow/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fundflow").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FundflowConfig::parse("").unwrap();
        assert_eq!(config, FundflowConfig::default());
        assert_eq!(config.backend.endpoint, "http://localhost:8000/analyze");
        assert_eq!(config.client.default_identifier, "120503");
    }

    #[test]
    fn test_partial_config() {
        let config = FundflowConfig::parse("[backend]\ntimeout_secs = 30\n").unwrap();
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
        assert_eq!(config.backend.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let err = FundflowConfig::parse("[backend]\nendpoint = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, FundflowError::Config(_)));

        let err = FundflowConfig::parse("[backend]\nendpoint = \"ftp://host/analyze\"\n").unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(FundflowConfig::parse("[backend]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_endpoint_override() {
        let config = FundflowConfig::default()
            .with_endpoint("https://advisor.example.com/analyze")
            .unwrap();
        assert_eq!(config.backend.endpoint, "https://advisor.example.com/analyze");
        assert!(FundflowConfig::default().with_endpoint("nope").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("fundflow-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            FundflowConfig::load(Some(&path)),
            Err(FundflowError::Io(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FundflowConfig::default();
        assert_eq!(FundflowConfig::parse(&config.to_toml()).unwrap(), config);
    }
}
