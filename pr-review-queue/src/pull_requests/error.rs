//! Pull request fetch error types.

use thiserror::Error;

/// Errors that can occur while fetching pull requests.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub was unreachable, refused the credentials or returned garbage.
    #[error("GitHub API unavailable: {0}")]
    UpstreamUnavailable(#[from] octocrab::Error),
}
