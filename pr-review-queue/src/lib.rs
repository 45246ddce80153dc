#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod classify;
pub mod config;
pub mod discovery;
pub mod nicks;
pub mod notify;
pub mod pull_requests;
pub mod queue;
pub mod rate_limit;
pub mod render;
pub mod runner;
pub mod summary;
pub mod tls;

pub use classify::{classify, Category, ClassifiedPullRequest, Classifier, UnreviewedAddressee};
pub use config::{load_settings, ConfigError, QueueSettings};
pub use discovery::{discover_repositories, DiscoveredRepository};
pub use nicks::{NicksCipher, NicksError, UsernameMap};
pub use notify::{compose_message, DeliveryError, RunLink, SlackWebhook};
pub use pull_requests::{
    CiStatus, fetch_open_pull_requests, FetchError, FetchOptions, PullRequest, Review, Verdict,
};
pub use queue::Queue;
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use render::{mask_mentions, OutputFormat, RenderError, ReportRenderer};
pub use runner::{build_report, Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
pub use tls::install_crypto_provider;
