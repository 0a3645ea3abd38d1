//! Error types for schema resolution

use thiserror::Error;

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema resolution errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required query field (schema name or group id) was absent.
    #[error("Cannot retrieve schema because {0} is not present")]
    MissingField(&'static str),

    #[error("No schema was found for group {group} artifact {artifact}")]
    ArtifactNotFound { group: String, artifact: String },

    #[error("No schema was found for group {group} artifact {artifact} version {version}")]
    VersionNotFound {
        group: String,
        artifact: String,
        version: String,
    },

    /// A textual field was asked for as a number but does not parse as one.
    #[error("{field} {value:?} is not an integer")]
    NotNumeric {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Registry URL must not be empty")]
    MissingUrl,

    #[error("Invalid registry URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported registry URL scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },

    #[error("Could not create registry client")]
    ClientInit(#[source] reqwest::Error),

    #[error("Registry request for group {group} artifact {artifact} failed")]
    Transport {
        group: String,
        artifact: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected registry response for group {group} artifact {artifact}: {message}")]
    Registry {
        group: String,
        artifact: String,
        message: String,
    },
}

impl SchemaError {
    /// True when the error means the requested schema does not exist,
    /// as opposed to a configuration or transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchemaError::MissingField(_)
                | SchemaError::ArtifactNotFound { .. }
                | SchemaError::VersionNotFound { .. }
        )
    }
}
