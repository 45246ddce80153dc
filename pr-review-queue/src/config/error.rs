//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A value is present but unusable.
    #[error("Validation error in '{origin}': {message}")]
    ValidationError { origin: String, message: String },

    /// A required value was not supplied.
    #[error("Missing required value: {name}")]
    MissingValue { name: &'static str },
}
