//! Open pull request fetching.
//!
//! This module collects every open pull request of one repository, or of all
//! active repositories of an organization, together with their reviews,
//! outstanding review requests, diff size and CI state.

mod checks;
mod error;
mod model;

pub use error::FetchError;
pub use model::{CiStatus, PullRequest, Review, Verdict};

use crate::discovery::discover_repositories;
use crate::rate_limit::ensure_core_rate_limit;
use checks::fetch_ci_status;
use chrono::Utc;
use octocrab::models::pulls::{
    MergeableState, PullRequest as GitHubPullRequest, Review as GitHubReview, ReviewState,
};
use octocrab::{params, Octocrab};
use tracing::{debug, info, info_span, Instrument};

/// Results per page for pull request and review listing.
const RESULTS_PER_PAGE: u8 = 100;

/// Options that narrow what gets fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Leave draft pull requests out of the result.
    pub skip_drafts: bool,
}

/// Fetches all open pull requests of `org`, or only of `org/repo`.
///
/// When `repo` is `None` every active repository of the organization is
/// scanned in listing order and the results are concatenated. Each pull
/// request is tagged with its repository name.
///
/// # Errors
///
/// Returns [`FetchError::UpstreamUnavailable`] on the first failing API call.
/// No partial result is returned.
pub async fn fetch_open_pull_requests(
    octocrab: &Octocrab,
    org: &str,
    repo: Option<&str>,
    options: FetchOptions,
) -> Result<Vec<PullRequest>, FetchError> {
    let repositories: Vec<String> = match repo {
        Some(name) => {
            info!(org, repo = name, "Fetching pull requests from one repository");
            vec![name.to_string()]
        }
        None => {
            info!(org, "Fetching pull requests from an entire organization");
            discover_repositories(octocrab, org)
                .await?
                .into_iter()
                .map(|repository| repository.name)
                .collect()
        }
    };

    let mut pull_requests = Vec::new();
    for repository in &repositories {
        let fetched = fetch_repository(octocrab, org, repository, options).await?;
        pull_requests.extend(fetched);
    }

    info!(
        count = pull_requests.len(),
        repositories = repositories.len(),
        "Pull requests retrieved"
    );
    Ok(pull_requests)
}

/// Fetches the open pull requests of a single repository.
async fn fetch_repository(
    octocrab: &Octocrab,
    org: &str,
    repo: &str,
    options: FetchOptions,
) -> Result<Vec<PullRequest>, FetchError> {
    let span = info_span!("fetch", repo = %format!("{org}/{repo}"));

    async {
        ensure_core_rate_limit(octocrab).await?;

        let pulls_handler = octocrab.pulls(org, repo);
        let first_page = pulls_handler
            .list()
            .state(params::State::Open)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;
        let pulls = octocrab.all_pages(first_page).await?;
        debug!(count = pulls.len(), "Listed open pull requests");

        let mut pull_requests = Vec::with_capacity(pulls.len());
        for pull in pulls {
            if options.skip_drafts && pull.draft.unwrap_or(false) {
                debug!(number = pull.number, "Skipping draft pull request");
                continue;
            }

            let first_page = pulls_handler
                .list_reviews(pull.number)
                .per_page(RESULTS_PER_PAGE)
                .send()
                .await?;
            let reviews = octocrab.all_pages(first_page).await?;

            // The listing omits the diff size and mergeability.
            let details = pulls_handler.get(pull.number).await?;
            let ci_status = fetch_ci_status(octocrab, org, repo, &details.head.sha).await?;

            let pull_request = convert_pull_request(repo, details, reviews, Some(ci_status));
            info!(
                url = %pull_request.url,
                ci = ci_status.as_str(),
                "Processing pull request"
            );
            pull_requests.push(pull_request);
        }

        Ok(pull_requests)
    }
    .instrument(span)
    .await
}

/// Converts GitHub's pull request and review models into a [`PullRequest`].
fn convert_pull_request(
    repository: &str,
    pull: GitHubPullRequest,
    reviews: Vec<GitHubReview>,
    ci_status: Option<CiStatus>,
) -> PullRequest {
    let author = pull.user.map(|user| user.login).unwrap_or_default();
    let outstanding: Vec<String> = pull
        .requested_reviewers
        .unwrap_or_default()
        .into_iter()
        .map(|user| user.login)
        .collect();

    let reviews: Vec<Review> = reviews
        .into_iter()
        .filter_map(convert_review)
        .filter(|review| review.reviewer != author)
        .collect();

    let (requested_reviewers, re_requested) = merge_reviewers(outstanding, &reviews);
    let created_at = pull.created_at.unwrap_or_else(Utc::now);

    PullRequest {
        repository: repository.to_string(),
        number: pull.number,
        title: pull.title.unwrap_or_default(),
        url: pull.html_url.map(|url| url.to_string()).unwrap_or_default(),
        author,
        created_at,
        updated_at: pull.updated_at.unwrap_or(created_at),
        draft: pull.draft.unwrap_or(false),
        requested_reviewers,
        re_requested,
        reviews,
        labels: pull
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|label| label.name)
            .collect(),
        additions: pull.additions.unwrap_or_default(),
        deletions: pull.deletions.unwrap_or_default(),
        ci_status,
        needs_update: matches!(
            pull.mergeable_state,
            Some(MergeableState::Dirty | MergeableState::Behind)
        ),
    }
}

/// Maps a submitted GitHub review to a [`Review`].
///
/// Unsubmitted (`PENDING`) and dismissed reviews carry no verdict and are
/// dropped.
fn convert_review(review: GitHubReview) -> Option<Review> {
    let reviewer = review.user?.login;
    let verdict = review_verdict(review.state?)?;
    Some(Review {
        reviewer,
        verdict,
        submitted_at: review.submitted_at,
    })
}

fn review_verdict(state: ReviewState) -> Option<Verdict> {
    match state {
        ReviewState::Approved => Some(Verdict::Approved),
        ReviewState::ChangesRequested => Some(Verdict::ChangesRequested),
        ReviewState::Commented => Some(Verdict::Commented),
        _ => None,
    }
}

/// Combines GitHub's outstanding review requests with past reviewers.
///
/// GitHub drops a reviewer from the outstanding requests once they submit a
/// review, and adds them back when re-requested. The result lists everyone
/// asked for a review: reviewers with a decisive verdict first (in order of
/// their first review), then outstanding requests. The second vector holds
/// outstanding requests for reviewers who already reviewed.
fn merge_reviewers(outstanding: Vec<String>, reviews: &[Review]) -> (Vec<String>, Vec<String>) {
    let mut requested: Vec<String> = Vec::new();
    for review in reviews.iter().filter(|review| review.verdict.is_decisive()) {
        if !requested.contains(&review.reviewer) {
            requested.push(review.reviewer.clone());
        }
    }

    let mut re_requested: Vec<String> = Vec::new();
    for login in outstanding {
        let reviewed_before = reviews.iter().any(|review| review.reviewer == login);
        if reviewed_before && !re_requested.contains(&login) {
            re_requested.push(login.clone());
        }
        if !requested.contains(&login) {
            requested.push(login);
        }
    }

    (requested, re_requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logins(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn merge_keeps_outstanding_requests_without_reviews() {
        let (requested, re_requested) = merge_reviewers(logins(&["alice", "bob"]), &[]);

        assert_eq!(requested, logins(&["alice", "bob"]));
        assert!(re_requested.is_empty());
    }

    #[test]
    fn merge_puts_past_reviewers_before_outstanding() {
        let reviews = vec![Review::new("carol", Verdict::Approved)];

        let (requested, re_requested) = merge_reviewers(logins(&["bob"]), &reviews);

        assert_eq!(requested, logins(&["carol", "bob"]));
        assert!(re_requested.is_empty());
    }

    #[test]
    fn merge_ignores_comment_only_reviewers() {
        let reviews = vec![Review::new("dave", Verdict::Commented)];

        let (requested, _) = merge_reviewers(Vec::new(), &reviews);

        assert!(requested.is_empty());
    }

    #[test]
    fn merge_flags_re_requested_reviewers() {
        let reviews = vec![
            Review::new("alice", Verdict::ChangesRequested),
            Review::new("alice", Verdict::Commented),
            Review::new("erin", Verdict::Commented),
        ];

        let (requested, re_requested) = merge_reviewers(logins(&["alice", "erin"]), &reviews);

        assert_eq!(requested, logins(&["alice", "erin"]));
        assert_eq!(re_requested, logins(&["alice", "erin"]));
    }

    #[test]
    fn dismissed_and_pending_states_have_no_verdict() {
        assert_eq!(review_verdict(ReviewState::Dismissed), None);
        assert_eq!(review_verdict(ReviewState::Pending), None);
        assert_eq!(
            review_verdict(ReviewState::ChangesRequested),
            Some(Verdict::ChangesRequested)
        );
    }
}
