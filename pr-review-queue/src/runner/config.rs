//! Runner configuration.

use crate::config::{ConfigError, QueueSettings};
use crate::nicks::DEFAULT_NICKS_FILE;
use crate::render::OutputFormat;
use std::path::{Path, PathBuf};
use url::Url;

/// Origin reported for values that did not come from the settings file.
const COMMAND_LINE: &str = "command line";

/// Configuration for a review queue run.
#[derive(Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// Organization to scan.
    org: String,
    /// Single repository to scan instead of the whole organization.
    repo: Option<String>,
    /// Whether to build and send the report.
    queue: bool,
    /// Whether to print the message instead of sending it.
    dry_run: bool,
    /// Markup of the report.
    format: OutputFormat,
    /// Slack incoming webhook.
    webhook_url: Option<String>,
    /// Fernet key for the nicks file.
    nicks_key: Option<String>,
    /// Path to the encrypted nicks file.
    nicks_file: PathBuf,
    /// Settings from the settings file and overrides.
    settings: QueueSettings,
    /// GitHub API base URL, for GitHub Enterprise.
    api_url: Option<String>,
}

// Token, webhook and key are credentials.
impl std::fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("org", &self.org)
            .field("repo", &self.repo)
            .field("queue", &self.queue)
            .field("dry_run", &self.dry_run)
            .field("format", &self.format)
            .field("has_webhook", &self.webhook_url.is_some())
            .field("has_nicks_key", &self.nicks_key.is_some())
            .field("nicks_file", &self.nicks_file)
            .field("settings", &self.settings)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl RunnerConfig {
    /// Creates a configuration with defaults for everything but the
    /// credentials and the organization.
    pub fn new(token: String, org: String) -> Self {
        Self {
            token,
            org,
            repo: None,
            queue: true,
            dry_run: false,
            format: OutputFormat::default(),
            webhook_url: None,
            nicks_key: None,
            nicks_file: PathBuf::from(DEFAULT_NICKS_FILE),
            settings: QueueSettings::default(),
            api_url: None,
        }
    }

    /// Restricts the run to one repository.
    pub fn with_repo(mut self, repo: Option<String>) -> Self {
        self.repo = repo;
        self
    }

    /// Enables or disables building the report.
    pub fn with_queue(mut self, queue: bool) -> Self {
        self.queue = queue;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the report markup.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the Slack webhook URL.
    pub fn with_webhook_url(mut self, webhook_url: Option<String>) -> Self {
        self.webhook_url = webhook_url;
        self
    }

    /// Sets the key used to decrypt the nicks file.
    pub fn with_nicks_key(mut self, nicks_key: Option<String>) -> Self {
        self.nicks_key = nicks_key;
        self
    }

    /// Sets a custom nicks file path.
    pub fn with_nicks_file(mut self, nicks_file: PathBuf) -> Self {
        self.nicks_file = nicks_file;
        self
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: QueueSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets a custom GitHub API base URL.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the organization.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Returns the single repository, if any.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Returns whether the report is built.
    pub fn queue(&self) -> bool {
        self.queue
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the report markup.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns the Slack webhook URL.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    /// Returns the nicks key.
    pub fn nicks_key(&self) -> Option<&str> {
        self.nicks_key.as_deref()
    }

    /// Returns the nicks file path.
    pub fn nicks_file(&self) -> &Path {
        &self.nicks_file
    }

    /// Returns the settings.
    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Returns the GitHub API base URL.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Whether this run posts to Slack.
    pub fn delivers(&self) -> bool {
        self.queue && !self.dry_run
    }

    /// Checks the configuration without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] for a missing token,
    /// organization or (when delivering) webhook, and
    /// [`ConfigError::ValidationError`] for malformed URLs or settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingValue { name: "GITHUB_TOKEN" });
        }
        if self.org.trim().is_empty() {
            return Err(ConfigError::MissingValue { name: "--org" });
        }
        if self.repo.as_deref().is_some_and(|repo| repo.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                origin: COMMAND_LINE.to_string(),
                message: "--repo must not be empty".to_string(),
            });
        }

        self.settings.validate(COMMAND_LINE)?;

        if let Some(api_url) = &self.api_url {
            parse_http_url(api_url, "GitHub API URL")?;
        }

        if self.delivers() {
            self.parsed_webhook_url()?;
        }

        Ok(())
    }

    /// Parses the webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingValue`] if no webhook is set, or
    /// [`ConfigError::ValidationError`] if it is not an http(s) URL.
    pub fn parsed_webhook_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingValue {
                name: "SLACK_WEBHOOK_URL",
            })?;
        parse_http_url(raw, "Slack webhook URL")
    }
}

fn parse_http_url(raw: &str, what: &str) -> Result<Url, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        // The raw value may embed a credential, so it is not echoed.
        _ => Err(ConfigError::ValidationError {
            origin: COMMAND_LINE.to_string(),
            message: format!("{what} is not a valid http(s) URL"),
        }),
    }
}
