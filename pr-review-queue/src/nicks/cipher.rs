//! Fernet encryption of nicks file values.
//!
//! Only values are encrypted. GitHub logins stay readable so the file can be
//! reviewed and extended without the key.

use super::error::NicksError;
use super::{read_mapping, write_mapping, Mapping};
use fernet::Fernet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix appended to the file stem of encrypted nicks files.
const ENCRYPTED_SUFFIX: &str = "_encrypted";

/// Encrypts and decrypts nicks file values with a Fernet key.
pub struct NicksCipher {
    fernet: Fernet,
}

impl std::fmt::Debug for NicksCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NicksCipher").finish_non_exhaustive()
    }
}

impl NicksCipher {
    /// Creates a cipher from a url-safe base64 Fernet key.
    ///
    /// # Errors
    ///
    /// Returns [`NicksError::InvalidKey`] if the key is malformed.
    pub fn new(key: &str) -> Result<Self, NicksError> {
        Fernet::new(key.trim())
            .map(|fernet| Self { fernet })
            .ok_or(NicksError::InvalidKey)
    }

    /// Generates a fresh random key.
    #[must_use]
    pub fn generate_key() -> String {
        Fernet::generate_key()
    }

    /// Encrypts every value of the mapping.
    #[must_use]
    pub fn encrypt_values(&self, mapping: &Mapping) -> Mapping {
        mapping
            .iter()
            .map(|(login, slack_id)| (login.clone(), self.fernet.encrypt(slack_id.as_bytes())))
            .collect()
    }

    /// Decrypts every value of the mapping.
    ///
    /// # Errors
    ///
    /// Returns [`NicksError::Decrypt`] naming the first value that fails.
    pub fn decrypt_values(&self, mapping: &Mapping) -> Result<Mapping, NicksError> {
        mapping
            .iter()
            .map(|(login, token)| {
                let decrypt_error = || NicksError::Decrypt {
                    login: login.clone(),
                };
                let bytes = self.fernet.decrypt(token).map_err(|_| decrypt_error())?;
                let slack_id = String::from_utf8(bytes).map_err(|_| decrypt_error())?;
                Ok((login.clone(), slack_id))
            })
            .collect()
    }

    /// Encrypts a plain nicks file next to itself.
    ///
    /// `slack_nicks.yaml` is written to `slack_nicks_encrypted.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`NicksError`] if reading, parsing or writing fails.
    pub fn encrypt_file(&self, plain_path: &Path) -> Result<PathBuf, NicksError> {
        let mapping = read_mapping(plain_path)?;
        let target = encrypted_path_for(plain_path);
        write_mapping(&target, &self.encrypt_values(&mapping))?;
        info!(path = %target.display(), count = mapping.len(), "Encryption complete");
        Ok(target)
    }

    /// Decrypts an encrypted nicks file next to itself.
    ///
    /// `slack_nicks_encrypted.yaml` is written to `slack_nicks.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`NicksError`] if reading, decrypting or writing fails.
    pub fn decrypt_file(&self, encrypted_path: &Path) -> Result<PathBuf, NicksError> {
        let mapping = read_mapping(encrypted_path)?;
        let decrypted = self.decrypt_values(&mapping)?;
        let target = decrypted_path_for(encrypted_path);
        write_mapping(&target, &decrypted)?;
        info!(path = %target.display(), count = decrypted.len(), "Decryption complete");
        Ok(target)
    }
}

/// Path of the encrypted counterpart of a plain nicks file.
#[must_use]
pub fn encrypted_path_for(plain_path: &Path) -> PathBuf {
    with_stem(plain_path, |stem| format!("{stem}{ENCRYPTED_SUFFIX}"))
}

/// Path of the plain counterpart of an encrypted nicks file.
///
/// Files without the `_encrypted` suffix get a `_decrypted` suffix instead,
/// so the source is never overwritten.
#[must_use]
pub fn decrypted_path_for(encrypted_path: &Path) -> PathBuf {
    with_stem(encrypted_path, |stem| match stem.strip_suffix(ENCRYPTED_SUFFIX) {
        Some(plain) if !plain.is_empty() => plain.to_string(),
        _ => format!("{stem}_decrypted"),
    })
}

fn with_stem(path: &Path, rename: impl FnOnce(&str) -> String) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut file_name = rename(&stem);
    if let Some(extension) = path.extension() {
        file_name.push('.');
        file_name.push_str(&extension.to_string_lossy());
    }
    path.with_file_name(file_name)
}
