//! Ordered classification rules.
//!
//! Each rule pairs a predicate over the review state of a pull request with
//! the category it assigns and who gets pinged. Rules are evaluated top to
//! bottom and the first match wins; the last rule always matches.

use super::{Category, UnreviewedAddressee};
use crate::pull_requests::{PullRequest, Verdict};

/// Review state of a pull request, reduced to what the rules look at.
pub(super) struct ReviewState<'a> {
    pub(super) pull_request: &'a PullRequest,
    /// Effective verdict per reviewer, in order of their first review.
    verdicts: Vec<(&'a str, Verdict)>,
    /// Requested reviewers still owing a review, in request order.
    pending: Vec<&'a str>,
}

impl<'a> ReviewState<'a> {
    pub(super) fn new(pull_request: &'a PullRequest) -> Self {
        let is_re_requested =
            |login: &str| pull_request.re_requested.iter().any(|other| other == login);

        // Latest decisive verdict wins; a comment never overrides a decision.
        // A fresh request resets the reviewer, so their past reviews are ignored.
        let mut verdicts: Vec<(&str, Verdict)> = Vec::new();
        for review in &pull_request.reviews {
            if is_re_requested(&review.reviewer) {
                continue;
            }
            match verdicts
                .iter_mut()
                .find(|(login, _)| *login == review.reviewer)
            {
                Some(entry) if review.verdict.is_decisive() => entry.1 = review.verdict,
                Some(_) => {}
                None => verdicts.push((review.reviewer.as_str(), review.verdict)),
            }
        }

        let mut pending: Vec<&str> = Vec::new();
        for login in pull_request
            .requested_reviewers
            .iter()
            .chain(&pull_request.re_requested)
        {
            let reviewed = verdicts.iter().any(|(reviewer, _)| reviewer == login);
            if !reviewed && !pending.contains(&login.as_str()) {
                pending.push(login);
            }
        }

        Self {
            pull_request,
            verdicts,
            pending,
        }
    }

    fn verdict_of(&self, login: &str) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|(reviewer, _)| *reviewer == login)
            .map(|(_, verdict)| *verdict)
    }

    fn any_verdict(&self, verdict: Verdict) -> bool {
        self.verdicts.iter().any(|(_, other)| *other == verdict)
    }
}

/// Who gets pinged when a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AddresseeRule {
    /// The pull request author.
    Author,
    /// The reviewers still owing a review.
    PendingReviewers,
    /// Decided by the [`UnreviewedAddressee`] policy.
    Unreviewed,
}

impl AddresseeRule {
    pub(super) fn resolve(self, state: &ReviewState<'_>, policy: UnreviewedAddressee) -> Vec<String> {
        let author = || vec![state.pull_request.author.clone()];
        match self {
            Self::Author => author(),
            Self::PendingReviewers => state.pending.iter().map(|login| login.to_string()).collect(),
            Self::Unreviewed => match policy {
                UnreviewedAddressee::Author => author(),
                UnreviewedAddressee::Nobody => Vec::new(),
            },
        }
    }
}

/// A single row of the decision table.
pub(super) struct Rule {
    /// Short name used in debug logs.
    pub(super) name: &'static str,
    pub(super) matches: fn(&ReviewState<'_>) -> bool,
    pub(super) category: Category,
    pub(super) addressees: AddresseeRule,
}

/// The decision table, in precedence order.
pub(super) static RULES: [Rule; 4] = [
    Rule {
        name: "unresolved-change-request",
        matches: has_unresolved_change_request,
        category: Category::ChangesRequested,
        addressees: AddresseeRule::Author,
    },
    Rule {
        name: "fully-approved",
        matches: is_fully_approved,
        category: Category::ApprovedReady,
        addressees: AddresseeRule::Author,
    },
    Rule {
        name: "pending-reviewers",
        matches: has_pending_reviewers,
        category: Category::AwaitingReview,
        addressees: AddresseeRule::PendingReviewers,
    },
    Rule {
        name: "unreviewed",
        matches: always,
        category: Category::AwaitingReview,
        addressees: AddresseeRule::Unreviewed,
    },
];

fn has_unresolved_change_request(state: &ReviewState<'_>) -> bool {
    state.any_verdict(Verdict::ChangesRequested)
}

fn is_fully_approved(state: &ReviewState<'_>) -> bool {
    state.pending.is_empty()
        && state.any_verdict(Verdict::Approved)
        && state
            .pull_request
            .requested_reviewers
            .iter()
            .all(|login| state.verdict_of(login) == Some(Verdict::Approved))
}

fn has_pending_reviewers(state: &ReviewState<'_>) -> bool {
    !state.pending.is_empty()
}

fn always(_: &ReviewState<'_>) -> bool {
    true
}

/// Returns the first rule matching `state`.
pub(super) fn first_match(state: &ReviewState<'_>) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.matches)(state))
        .unwrap_or(&RULES[RULES.len() - 1])
}
