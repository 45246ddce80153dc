//! GitHub login to Slack user id mapping.
//!
//! The mapping lives in a YAML file whose values are Fernet tokens. It is
//! decrypted once at startup into a [`UsernameMap`] that the renderer
//! consults for mentions.

mod cipher;
mod error;

pub use cipher::{decrypted_path_for, encrypted_path_for, NicksCipher};
pub use error::NicksError;

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Default name of the encrypted nicks file.
pub const DEFAULT_NICKS_FILE: &str = "slack_nicks_encrypted.yaml";

/// Default name of the plain nicks file.
pub const DEFAULT_PLAIN_NICKS_FILE: &str = "slack_nicks.yaml";

/// Login to value mapping as stored on disk.
pub type Mapping = BTreeMap<String, String>;

/// Read-only mapping from GitHub login to Slack user id.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UsernameMap {
    entries: Mapping,
}

impl std::fmt::Debug for UsernameMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernameMap")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl UsernameMap {
    /// Creates an empty map. Every mention falls back to the GitHub login.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from login and Slack id pairs.
    pub fn from_entries<L, S>(entries: impl IntoIterator<Item = (L, S)>) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(login, slack_id)| (login.into(), slack_id.into()))
                .collect(),
        }
    }

    /// Loads and decrypts an encrypted nicks file.
    ///
    /// # Errors
    ///
    /// Returns [`NicksError`] if the key is invalid, or the file cannot be
    /// read, parsed or decrypted.
    pub fn load_encrypted(path: &Path, key: &str) -> Result<Self, NicksError> {
        let cipher = NicksCipher::new(key)?;
        let encrypted = read_mapping(path)?;
        let entries = cipher.decrypt_values(&encrypted)?;
        info!(path = %path.display(), count = entries.len(), "Loaded Slack nicks");
        Ok(Self { entries })
    }

    /// Slack id of a GitHub login.
    #[must_use]
    pub fn get(&self, login: &str) -> Option<&str> {
        self.entries.get(login).map(String::as_str)
    }

    /// Number of mapped logins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no login is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Login and Slack id pairs, ordered by login.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(login, slack_id)| (login.as_str(), slack_id.as_str()))
    }
}

/// Reads a YAML mapping. An empty file is an empty mapping.
fn read_mapping(path: &Path) -> Result<Mapping, NicksError> {
    debug!(path = %path.display(), "Reading nicks file");
    let content = std::fs::read_to_string(path).map_err(|e| NicksError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    serde_yaml::from_str(&content).map_err(|e| NicksError::Yaml {
        path: path.display().to_string(),
        source: e,
    })
}

/// Writes a YAML mapping, replacing the file.
fn write_mapping(path: &Path, mapping: &Mapping) -> Result<(), NicksError> {
    let content = serde_yaml::to_string(mapping).map_err(|e| NicksError::Yaml {
        path: path.display().to_string(),
        source: e,
    })?;

    std::fs::write(path, content).map_err(|e| NicksError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
