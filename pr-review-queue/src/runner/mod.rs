//! Orchestrates a review queue run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::{RunnerError, EXIT_CONFIGURATION, EXIT_FAILURE};

use crate::classify::Classifier;
use crate::config::QueueSettings;
use crate::nicks::UsernameMap;
use crate::notify::{compose_message, running_in_github_actions, RunLink, SlackWebhook};
use crate::pull_requests::{fetch_open_pull_requests, FetchOptions, PullRequest};
use crate::queue::{self, Queue};
use crate::render::{mask_mentions, OutputFormat, RenderError, ReportRenderer};
use crate::summary::RunSummary;
use chrono::{DateTime, Duration, Utc};
use octocrab::Octocrab;
use tracing::{info, warn};

/// Classifies, groups and renders fetched pull requests.
///
/// Pure apart from logging: `now` is the reference time for staleness and
/// "updated N days ago".
///
/// # Errors
///
/// Returns [`RenderError`] if the report cannot be rendered.
pub fn build_report(
    pull_requests: Vec<PullRequest>,
    settings: &QueueSettings,
    nicks: &UsernameMap,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Result<(Queue, String), RenderError> {
    let classifier = Classifier::new(now)
        .with_stale_after(Duration::days(i64::from(settings.stale_after_days)))
        .with_unreviewed(settings.unreviewed_addressee);
    let queue = queue::build(classifier.classify_all(pull_requests));

    let report = ReportRenderer::new(now)?
        .with_jira_base_url(settings.jira_base_url.clone())
        .render(&queue, nicks, format)?;

    Ok((queue, report))
}

/// Orchestrates a full fetch, report and notification run.
pub struct Runner {
    config: RunnerConfig,
    octocrab: Octocrab,
    nicks: UsernameMap,
    webhook: Option<SlackWebhook>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("config", &self.config)
            .field("nicks", &self.nicks)
            .field("webhook", &self.webhook)
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// Validates the configuration and loads the nicks file before any
    /// network access.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] or [`RunnerError::Nicks`] for
    /// configuration problems, or [`RunnerError::Octocrab`] if the GitHub
    /// client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let nicks = load_nicks(&config)?;

        let webhook = if config.delivers() {
            Some(SlackWebhook::new(config.parsed_webhook_url()?))
        } else {
            None
        };

        crate::tls::install_crypto_provider();
        let mut builder = Octocrab::builder().personal_token(config.token().to_string());
        if let Some(api_url) = config.api_url() {
            builder = builder.base_uri(api_url)?;
        }
        let octocrab = builder.build()?;

        Ok(Self {
            config,
            octocrab,
            nicks,
            webhook,
        })
    }

    /// Executes the full orchestration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first failing step. Nothing is sent
    /// unless every earlier step succeeded.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let settings = self.config.settings();

        let pull_requests = fetch_open_pull_requests(
            &self.octocrab,
            self.config.org(),
            self.config.repo(),
            FetchOptions {
                skip_drafts: settings.skip_drafts,
            },
        )
        .await?;
        summary.record_fetched(pull_requests.iter().map(|pr| pr.repository.as_str()));
        info!(
            count = summary.pull_requests_fetched,
            repositories = summary.repositories_with_pull_requests,
            "Fetched open pull requests"
        );

        if !self.config.queue() {
            info!("Review queue disabled, not building a report");
            return Ok(summary);
        }

        let format = self.config.format();
        let (queue, report) =
            build_report(pull_requests, settings, &self.nicks, format, Utc::now())?;
        summary.record_queue(&queue);

        if queue.is_empty() {
            info!("No pull requests match the review queue criteria");
            return Ok(summary);
        }

        let message = compose_message(
            &report,
            settings.greeting.as_deref(),
            RunLink::from_env().as_ref(),
            format,
        );

        match &self.webhook {
            Some(webhook) => {
                webhook.send(&message).await?;
                summary.delivered = true;
            }
            None => {
                info!("Dry run, not sending the Slack message");
                summary.preview = Some(self.preview(&message));
            }
        }

        Ok(summary)
    }

    /// Message as it may be shown in logs.
    ///
    /// Inside GitHub Actions the logs can be public, so Slack ids are
    /// replaced by GitHub logins.
    fn preview(&self, message: &str) -> String {
        if running_in_github_actions() {
            mask_mentions(message, &self.nicks, self.config.format())
        } else {
            message.to_string()
        }
    }
}

fn load_nicks(config: &RunnerConfig) -> Result<UsernameMap, RunnerError> {
    match config.nicks_key() {
        Some(key) => Ok(UsernameMap::load_encrypted(config.nicks_file(), key)?),
        None => {
            warn!("No key provided to decrypt Slack nicks, mentions fall back to GitHub logins");
            Ok(UsernameMap::new())
        }
    }
}
