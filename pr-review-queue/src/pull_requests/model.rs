//! Pull request snapshot types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// The reviewer approved the change.
    Approved,
    /// The reviewer asked for changes.
    ChangesRequested,
    /// The reviewer left comments without a decision.
    Commented,
}

impl Verdict {
    /// Whether the verdict is a decision (approve or request changes).
    #[must_use]
    pub fn is_decisive(self) -> bool {
        !matches!(self, Self::Commented)
    }
}

/// Combined CI state of the head commit.
///
/// Check runs and legacy commit statuses are folded into one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CiStatus {
    /// Every check run and status passed.
    Success,
    /// A check run or status failed.
    Failure,
    /// Statuses are still running.
    Pending,
}

impl CiStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Pending => "pending",
        }
    }

    /// Traffic light shown next to the entry.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Success => "🟢",
            Self::Failure => "🔴",
            Self::Pending => "🟠",
        }
    }
}

/// A completed review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Login of the reviewer.
    pub reviewer: String,

    /// The submitted verdict.
    pub verdict: Verdict,

    /// When the review was submitted, if GitHub reported it.
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Creates a review without a submission time.
    pub fn new(reviewer: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            reviewer: reviewer.into(),
            verdict,
            submitted_at: None,
        }
    }
}

/// An open pull request as seen at fetch time.
///
/// Reviews are ordered oldest first. `requested_reviewers` holds everyone who
/// was asked for a review, whether or not they already answered, and
/// `re_requested` the ones among them asked again after reviewing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Repository name (without the owner).
    pub repository: String,

    /// Pull request number.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Browser URL of the pull request.
    pub url: String,

    /// Login of the author.
    pub author: String,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Last update time.
    pub updated_at: DateTime<Utc>,

    /// Whether the pull request is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Logins of requested reviewers, in request order.
    #[serde(default)]
    pub requested_reviewers: Vec<String>,

    /// Requested reviewers asked again after submitting a review.
    #[serde(default)]
    pub re_requested: Vec<String>,

    /// Completed reviews, oldest first.
    #[serde(default)]
    pub reviews: Vec<Review>,

    /// Label names.
    #[serde(default)]
    pub labels: Vec<String>,

    /// Lines added.
    #[serde(default)]
    pub additions: u64,

    /// Lines removed.
    #[serde(default)]
    pub deletions: u64,

    /// CI state of the head commit, when known.
    #[serde(default)]
    pub ci_status: Option<CiStatus>,

    /// The branch conflicts with, or lags behind, its base.
    #[serde(default)]
    pub needs_update: bool,
}

impl PullRequest {
    /// Age of the pull request relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.created_at)
    }

    /// Whole days since the last update, never negative.
    #[must_use]
    pub fn days_since_update(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.updated_at)
            .num_days()
            .max(0)
    }
}
