//! Pull request classification.
//!
//! Sorts every pull request into exactly one [`Category`] and works out whom
//! to ping, using the decision table in `rules`. Classification is pure: the
//! reference time for staleness is passed in rather than read from the clock.

mod category;
mod rules;

pub use category::Category;

use crate::pull_requests::PullRequest;
use chrono::{DateTime, Duration, Utc};
use rules::{first_match, ReviewState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of days after which a pull request counts as stale.
pub const DEFAULT_STALE_AFTER_DAYS: u32 = 14;

/// Who to ping for a pull request nobody has been asked to review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnreviewedAddressee {
    /// Ping the author so they find a reviewer.
    #[default]
    Author,
    /// Ping nobody.
    Nobody,
}

/// A pull request with its category and addressees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedPullRequest {
    /// The classified pull request.
    pub pull_request: PullRequest,

    /// The section it belongs to.
    pub category: Category,

    /// Logins to mention, in order, without duplicates.
    pub addressees: Vec<String>,

    /// Whether the pull request is older than the stale threshold.
    pub stale: bool,
}

/// Classifies a pull request.
///
/// Returns the category and the logins to mention. Evaluates the rules in
/// precedence order:
///
/// 1. an unresolved change request pings the author,
/// 2. approval by every requested reviewer pings the author,
/// 3. pending reviewers are pinged themselves,
/// 4. anything else is awaiting review, addressed per `unreviewed`.
#[must_use]
pub fn classify(
    pull_request: &PullRequest,
    unreviewed: UnreviewedAddressee,
) -> (Category, Vec<String>) {
    let state = ReviewState::new(pull_request);
    let rule = first_match(&state);
    debug!(
        repo = %pull_request.repository,
        number = pull_request.number,
        rule = rule.name,
        category = %rule.category,
        "Classified pull request"
    );
    (rule.category, rule.addressees.resolve(&state, unreviewed))
}

/// Classifies pull requests relative to a fixed point in time.
#[derive(Debug, Clone)]
pub struct Classifier {
    now: DateTime<Utc>,
    stale_after: Duration,
    unreviewed: UnreviewedAddressee,
}

impl Classifier {
    /// Creates a classifier with default settings.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            stale_after: Duration::days(i64::from(DEFAULT_STALE_AFTER_DAYS)),
            unreviewed: UnreviewedAddressee::default(),
        }
    }

    /// Sets the age after which pull requests are flagged stale.
    #[must_use]
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Sets who to ping for pull requests without reviewers.
    #[must_use]
    pub fn with_unreviewed(mut self, unreviewed: UnreviewedAddressee) -> Self {
        self.unreviewed = unreviewed;
        self
    }

    /// Whether a pull request is older than the stale threshold.
    #[must_use]
    pub fn is_stale(&self, pull_request: &PullRequest) -> bool {
        pull_request.age(self.now) > self.stale_after
    }

    /// Classifies a single pull request.
    #[must_use]
    pub fn classify(&self, pull_request: PullRequest) -> ClassifiedPullRequest {
        let (category, addressees) = classify(&pull_request, self.unreviewed);
        let stale = self.is_stale(&pull_request);
        ClassifiedPullRequest {
            pull_request,
            category,
            addressees,
            stale,
        }
    }

    /// Classifies pull requests, keeping their order.
    #[must_use]
    pub fn classify_all(&self, pull_requests: Vec<PullRequest>) -> Vec<ClassifiedPullRequest> {
        pull_requests
            .into_iter()
            .map(|pull_request| self.classify(pull_request))
            .collect()
    }
}
