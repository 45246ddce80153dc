//! CLI for the pull request review queue.
//!
//! Fetches the open pull requests of an organization, sorts them into a
//! review queue and posts it to Slack.

use clap::Parser;
use pr_review_queue::{load_settings, OutputFormat, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Pull Request Review Queue - Ping the people a pull request is waiting for.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Organization on GitHub.
    #[arg(long)]
    org: String,

    /// Single repository in `--org`.
    #[arg(long)]
    repo: Option<String>,

    /// Build and send the review queue (default).
    #[arg(long, overrides_with = "no_queue")]
    queue: bool,

    /// Only fetch pull requests, without building a review queue.
    #[arg(long, overrides_with = "queue")]
    no_queue: bool,

    /// Print the message instead of sending it to Slack.
    #[arg(long)]
    dry_run: bool,

    /// Use Slack markup instead of plain text.
    #[arg(long)]
    slack_format: bool,

    /// Slack incoming webhook URL.
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    slack_webhook_url: Option<String>,

    /// Key to decrypt the Slack nicks file.
    #[arg(long, env = "SLACK_NICKS_KEY", hide_env_values = true)]
    nicks_key: Option<String>,

    /// Path to the encrypted Slack nicks file.
    #[arg(long, default_value = pr_review_queue::nicks::DEFAULT_NICKS_FILE)]
    nicks_file: PathBuf,

    /// Path to a TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Days after which a pull request is flagged stale. Overrides the settings file.
    #[arg(long)]
    stale_after_days: Option<u32>,

    /// Leave draft pull requests out. Overrides the settings file.
    #[arg(long)]
    skip_drafts: bool,

    /// GitHub API base URL, for GitHub Enterprise.
    #[arg(long, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    pr_review_queue::tls::install_crypto_provider();

    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Turns parsed arguments into a runner configuration.
fn build_config(args: Args) -> Result<RunnerConfig, RunnerError> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Default::default(),
    };
    if let Some(days) = args.stale_after_days {
        settings.stale_after_days = days;
    }
    if args.skip_drafts {
        settings.skip_drafts = true;
    }

    let format = if args.slack_format {
        OutputFormat::Slack
    } else {
        OutputFormat::Plain
    };

    Ok(RunnerConfig::new(args.github_token, args.org)
        .with_repo(args.repo)
        .with_queue(args.queue || !args.no_queue)
        .with_dry_run(args.dry_run)
        .with_format(format)
        .with_webhook_url(args.slack_webhook_url)
        .with_nicks_key(args.nicks_key)
        .with_nicks_file(args.nicks_file)
        .with_settings(settings)
        .with_api_url(args.github_api_url))
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = build_config(args)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the dry-run message and the final run summary.
fn print_summary(summary: &RunSummary) {
    if let Some(preview) = &summary.preview {
        println!("--- Message ---");
        println!("{preview}");
    }

    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Pull requests fetched: {}", summary.pull_requests_fetched);
    println!(
        "  Repositories with pull requests: {}",
        summary.repositories_with_pull_requests
    );
    println!("  Changes requested: {}", summary.changes_requested);
    println!("  Awaiting review: {}", summary.awaiting_review);
    println!("  Ready to merge: {}", summary.approved_ready);
    println!("  Stale: {}", summary.stale);

    if !summary.dry_run {
        println!("  Delivered: {}", if summary.delivered { "yes" } else { "no" });
    }
}
