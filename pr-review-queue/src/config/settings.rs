//! Optional settings file.

use super::ConfigError;
use crate::classify::{UnreviewedAddressee, DEFAULT_STALE_AFTER_DAYS};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Tunables read from the settings file.
///
/// Every key is optional. Example:
///
/// ```toml
/// stale-after-days = 14
/// unreviewed-addressee = "author"
/// greeting = "Good morning, reviewers!"
/// jira-base-url = "https://issues.example.com/browse"
/// skip-drafts = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct QueueSettings {
    /// Days after which a pull request is flagged stale.
    pub stale_after_days: u32,

    /// Who to ping for pull requests nobody was asked to review.
    pub unreviewed_addressee: UnreviewedAddressee,

    /// Line posted above the report.
    pub greeting: Option<String>,

    /// Jira browse URL used to link issue keys in titles.
    pub jira_base_url: Option<String>,

    /// Leave draft pull requests out of the queue.
    pub skip_drafts: bool,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            unreviewed_addressee: UnreviewedAddressee::default(),
            greeting: None,
            jira_base_url: None,
            skip_drafts: false,
        }
    }
}

impl QueueSettings {
    /// Checks value ranges and URL syntax.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming `origin` on the first
    /// invalid value.
    pub fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        if self.stale_after_days == 0 {
            return Err(ConfigError::ValidationError {
                origin: origin.to_string(),
                message: "stale-after-days must be greater than zero".to_string(),
            });
        }

        if let Some(jira_base_url) = &self.jira_base_url {
            let valid = Url::parse(jira_base_url)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(ConfigError::ValidationError {
                    origin: origin.to_string(),
                    message: format!("jira-base-url is not a valid http(s) URL: {jira_base_url}"),
                });
            }
        }

        Ok(())
    }
}

/// Loads and validates a settings file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
/// has unknown keys, or fails validation.
pub fn load_settings(path: &Path) -> Result<QueueSettings, ConfigError> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: origin.clone(),
        source: e,
    })?;

    let settings: QueueSettings = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: origin.clone(),
        source: e,
    })?;

    settings.validate(&origin)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(content: &str) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn full_settings_file() {
        let (_temp, path) = write_settings(
            r#"
stale-after-days = 7
unreviewed-addressee = "nobody"
greeting = "Good morning, image builders!"
jira-base-url = "https://issues.example.com/browse"
skip-drafts = true
"#,
        );

        let settings = load_settings(&path).unwrap();

        assert_eq!(settings.stale_after_days, 7);
        assert_eq!(settings.unreviewed_addressee, UnreviewedAddressee::Nobody);
        assert_eq!(settings.greeting.as_deref(), Some("Good morning, image builders!"));
        assert!(settings.skip_drafts);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let (_temp, path) = write_settings("");

        assert_eq!(load_settings(&path).unwrap(), QueueSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_temp, path) = write_settings("stale-days = 3\n");

        assert!(matches!(load_settings(&path), Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn zero_stale_days_is_invalid() {
        let (_temp, path) = write_settings("stale-after-days = 0\n");

        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn jira_url_must_be_http() {
        let (_temp, path) = write_settings("jira-base-url = \"not a url\"\n");
        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::ValidationError { .. })
        ));

        let (_temp, path) = write_settings("jira-base-url = \"ftp://issues.example.com\"\n");
        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();

        let result = load_settings(&temp.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
