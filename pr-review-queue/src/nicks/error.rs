//! Username map error types.

use thiserror::Error;

/// Errors that can occur while loading or converting the nicks file.
#[derive(Debug, Error)]
pub enum NicksError {
    /// The key is not a valid Fernet key.
    #[error("Invalid Fernet key; generate one with `encrypt-slack-nicks --generate-new-key`")]
    InvalidKey,

    /// Failed to read or write a file.
    #[error("Failed to access nicks file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize YAML content.
    #[error("Failed to parse nicks file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value could not be decrypted with the given key.
    #[error("Failed to decrypt the Slack id of '{login}'; wrong key or corrupted file")]
    Decrypt { login: String },
}
