//! Rate limit handling for the GitHub core API.
//!
//! Fetching an organization issues one call per repository plus one per pull
//! request, so a large organization can drain the hourly budget. Before each
//! repository the remaining budget is checked and the run sleeps until the
//! reset when it runs low.

use octocrab::Octocrab;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit information for the core resource.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Unix timestamp when the rate limit resets.
    pub reset: u64,
    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Seconds to sleep before the next request, if any.
    ///
    /// Capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_secs(&self, now: u64) -> Option<u64> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }
        Some((self.reset - now).min(MAX_WAIT_SECS))
    }
}

/// Checks the current rate limit status for the core API (repos, pulls).
///
/// Returns `None` when the server has no rate limit. GitHub Enterprise
/// answers `/rate_limit` with 404 when rate limiting is disabled.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(
    octocrab: &Octocrab,
) -> Result<Option<RateLimitInfo>, octocrab::Error> {
    let rate_limit = match octocrab.ratelimit().get().await {
        Ok(rate_limit) => rate_limit,
        Err(e) if is_not_found(&e) => {
            debug!("Rate limiting is disabled on this server");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    let core = &rate_limit.resources.core;

    Ok(Some(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    }))
}

fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}

/// Waits if the rate limit is low, returning true if we waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait_secs) = info.wait_secs(now) else {
        return false;
    };

    if info.reset - now > MAX_WAIT_SECS {
        warn!(
            reset = info.reset,
            max_wait = MAX_WAIT_SECS,
            "Rate limit reset too far in future, capping wait time"
        );
    }

    info!(
        remaining = info.remaining,
        limit = info.limit,
        wait_secs,
        "Rate limit low, waiting for reset"
    );

    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
    true
}

/// Ensures sufficient rate limit before making core API calls.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    if let Some(info) = check_core_rate_limit(octocrab).await? {
        wait_if_needed(&info).await;
    }
    Ok(())
}
