//! Message composition and Slack delivery.

mod error;
mod webhook;

pub use error::DeliveryError;
pub use webhook::SlackWebhook;

use crate::render::OutputFormat;
use tracing::debug;
use url::Url;

/// Name shown on the link back to the CI run.
const RUN_LINK_LABEL: &str = "pr-review-queue";

/// Link to the GitHub Actions run that produced a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLink {
    url: Url,
}

impl RunLink {
    /// Creates a link to an arbitrary URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Builds the run link from the GitHub Actions environment.
    ///
    /// Returns `None` unless `GITHUB_SERVER_URL`, `GITHUB_REPOSITORY` and
    /// `GITHUB_RUN_ID` are all set and form a valid URL.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let server = std::env::var("GITHUB_SERVER_URL").ok()?;
        let repository = std::env::var("GITHUB_REPOSITORY").ok()?;
        let run_id = std::env::var("GITHUB_RUN_ID").ok()?;

        let raw = format!(
            "{}/{repository}/actions/runs/{run_id}",
            server.trim_end_matches('/')
        );
        match Url::parse(&raw) {
            Ok(url) => Some(Self { url }),
            Err(e) => {
                debug!(url = %raw, error = %e, "Ignoring malformed run link");
                None
            }
        }
    }
}

/// Returns true when running inside GitHub Actions.
#[must_use]
pub fn running_in_github_actions() -> bool {
    std::env::var_os("GITHUB_RUN_ID").is_some()
}

/// Builds the final message from a rendered report.
///
/// The optional greeting goes first, separated from the report by a blank
/// line. A run link, when given, prefixes the whole message.
#[must_use]
pub fn compose_message(
    report: &str,
    greeting: Option<&str>,
    run_link: Option<&RunLink>,
    format: OutputFormat,
) -> String {
    let mut message = String::new();

    if let Some(link) = run_link {
        let prefix = match format {
            OutputFormat::Plain => format!("{RUN_LINK_LABEL} ({}): ", link.url),
            OutputFormat::Slack => format!("<{}|{RUN_LINK_LABEL}>: ", link.url),
        };
        message.push_str(&prefix);
    }

    if let Some(greeting) = greeting.filter(|greeting| !greeting.trim().is_empty()) {
        message.push_str(greeting);
        message.push_str("\n\n");
    }

    message.push_str(report);
    message
}
