//! Run summary types.

use crate::classify::Category;
use crate::queue::Queue;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of open pull requests fetched.
    pub pull_requests_fetched: usize,

    /// Number of distinct repositories those pull requests belong to.
    pub repositories_with_pull_requests: usize,

    /// Entries in the changes-requested section.
    pub changes_requested: usize,

    /// Entries in the awaiting-review section.
    pub awaiting_review: usize,

    /// Entries in the approved-ready section.
    pub approved_ready: usize,

    /// Entries flagged stale, across all sections.
    pub stale: usize,

    /// Whether the message was posted to Slack.
    pub delivered: bool,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Message that would have been sent, on dry runs.
    pub preview: Option<String>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records the fetched pull requests by repository name.
    pub fn record_fetched<'a>(&mut self, repositories: impl IntoIterator<Item = &'a str>) {
        let mut names: Vec<&str> = repositories.into_iter().collect();
        self.pull_requests_fetched = names.len();
        names.sort_unstable();
        names.dedup();
        self.repositories_with_pull_requests = names.len();
    }

    /// Records the section sizes of a built queue.
    pub fn record_queue(&mut self, queue: &Queue) {
        for (category, entries) in queue.sections() {
            let count = match category {
                Category::ChangesRequested => &mut self.changes_requested,
                Category::AwaitingReview => &mut self.awaiting_review,
                Category::ApprovedReady => &mut self.approved_ready,
            };
            *count = entries.len();
            self.stale += entries.iter().filter(|entry| entry.stale).count();
        }
    }

    /// Total number of queued pull requests.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.changes_requested + self.awaiting_review + self.approved_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::pull_requests::PullRequest;
    use crate::queue;
    use chrono::{Duration, TimeZone, Utc};

    fn pull_request(repository: &str, number: u64, age_days: i64) -> PullRequest {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        PullRequest {
            repository: repository.to_string(),
            number,
            title: "Title".to_string(),
            url: format!("https://github.com/org/{repository}/pull/{number}"),
            author: "octocat".to_string(),
            created_at: now - Duration::days(age_days),
            updated_at: now,
            draft: false,
            requested_reviewers: vec!["alice".to_string()],
            re_requested: Vec::new(),
            reviews: Vec::new(),
            labels: Vec::new(),
            additions: 0,
            deletions: 0,
            ci_status: None,
            needs_update: false,
        }
    }

    #[test]
    fn records_fetch_and_queue_counts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let pull_requests = vec![
            pull_request("a", 1, 1),
            pull_request("b", 2, 30),
            pull_request("a", 3, 2),
        ];
        let mut summary = RunSummary::new(true);

        summary.record_fetched(pull_requests.iter().map(|pr| pr.repository.as_str()));
        let queue = queue::build(Classifier::new(now).classify_all(pull_requests));
        summary.record_queue(&queue);

        assert_eq!(summary.pull_requests_fetched, 3);
        assert_eq!(summary.repositories_with_pull_requests, 2);
        assert_eq!(summary.awaiting_review, 3);
        assert_eq!(summary.queued(), 3);
        assert_eq!(summary.stale, 1);
        assert!(summary.dry_run);
        assert!(!summary.delivered);
        assert!(summary.preview.is_none());
    }
}
