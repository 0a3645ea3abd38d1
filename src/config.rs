//! Configuration for the registry connection
//!
//! Supports loading configuration from:
//! - Explicit values ([`RegistryConfig::new`])
//! - Config file (apicurio.toml)
//! - Environment variables (APICURIO__URL, APICURIO__TIMEOUT_MS)
//!
//! ## Example config file (apicurio.toml):
//! ```toml
//! url = "http://localhost:8080/apis/registry/v2"
//! timeout_ms = 5000
//! ```

use config_crate::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::{Result, SchemaError};

/// Connection settings for a schema registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry REST API, including the API prefix
    /// (for Apicurio v2: `http://host:port/apis/registry/v2`)
    #[serde(default)]
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with the given registry URL and default timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        for location in ["apicurio.toml", ".apicurio.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (APICURIO__*)
        builder = builder.add_source(
            Environment::with_prefix("APICURIO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Check the configured URL and return it parsed.
    ///
    /// The URL must be non-empty and use the http or https scheme.
    pub fn validate(&self) -> Result<Url> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::MissingUrl);
        }

        let parsed = Url::parse(trimmed).map_err(|source| SchemaError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(SchemaError::UnsupportedScheme {
                scheme: scheme.to_string(),
            }),
        }
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert!(config.url.is_empty());
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn test_new_sets_url() {
        let config = RegistryConfig::new("http://localhost:8080/apis/registry/v2");
        assert_eq!(config.url, "http://localhost:8080/apis/registry/v2");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_validate_accepts_http_and_https() {
        let http = RegistryConfig::new("http://localhost:8080/apis/registry/v2");
        assert_eq!(
            http.validate().unwrap().as_str(),
            "http://localhost:8080/apis/registry/v2"
        );

        let https = RegistryConfig::new("https://registry.example.com/apis/registry/v2");
        assert!(https.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = RegistryConfig::new("   ");
        assert!(matches!(
            config.validate().unwrap_err(),
            SchemaError::MissingUrl
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_url() {
        let config = RegistryConfig::new("not a url");
        assert!(matches!(
            config.validate().unwrap_err(),
            SchemaError::InvalidUrl { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_unsupported_scheme() {
        let config = RegistryConfig::new("ftp://registry.example.com");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedScheme { ref scheme } if scheme == "ftp"));
    }

    #[test]
    fn test_load_layers_file_and_environment() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        std::fs::write(&path, "url = \"http://localhost:8080/apis/registry/v2\"\n").unwrap();

        std::env::set_var("APICURIO__TIMEOUT_MS", "1500");
        let config = RegistryConfig::load_from(path.to_str());
        std::env::remove_var("APICURIO__TIMEOUT_MS");

        let config = config.unwrap();
        assert_eq!(config.url, "http://localhost:8080/apis/registry/v2");
        assert_eq!(config.timeout_ms, 1500);
    }
}
