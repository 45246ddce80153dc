//! Runner error types.

use crate::config::ConfigError;
use crate::nicks::NicksError;
use crate::notify::DeliveryError;
use crate::pull_requests::FetchError;
use crate::render::RenderError;

/// Exit code for configuration failures.
pub const EXIT_CONFIGURATION: u8 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Errors that can occur while running the review queue.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid or missing configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The Slack nicks file could not be loaded.
    #[error(transparent)]
    Nicks(#[from] NicksError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Fetching pull requests failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The report could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Slack did not accept the message.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl RunnerError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Nicks(_) => EXIT_CONFIGURATION,
            Self::Octocrab(_) | Self::Fetch(_) | Self::Render(_) | Self::Delivery(_) => EXIT_FAILURE,
        }
    }
}
