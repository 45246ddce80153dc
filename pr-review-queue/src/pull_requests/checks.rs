//! CI state of a head commit.
//!
//! GitHub reports CI in two places: check runs (GitHub Actions and apps) and
//! the older commit statuses used by external CI. Both are folded into one
//! [`CiStatus`].

use super::model::CiStatus;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Check runs listed per commit.
const CHECK_RUNS_PER_PAGE: &str = "100";

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRuns {
    pub(crate) total_count: u64,
    #[serde(default)]
    pub(crate) check_runs: Vec<CheckRun>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRun {
    pub(crate) status: String,
    pub(crate) conclusion: Option<String>,
}

impl CheckRun {
    /// Completed runs that succeeded or were skipped count as passing.
    fn passed(&self) -> bool {
        self.status == "completed"
            && matches!(self.conclusion.as_deref(), Some("success" | "skipped"))
    }
}

impl CheckRuns {
    /// Whether every reported run passed.
    ///
    /// Runs beyond the first page are unseen and count as not passing.
    fn all_passed(&self) -> bool {
        let passed = self.check_runs.iter().filter(|run| run.passed()).count();
        passed as u64 == self.total_count
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CombinedStatus {
    pub(crate) state: String,
    #[serde(default)]
    pub(crate) total_count: u64,
}

/// Folds check runs and the combined commit status into one state.
///
/// A combined state of `pending` with no statuses at all means external CI
/// never reported, so the check runs alone decide.
pub(crate) fn combine(check_runs: &CheckRuns, status: Option<&CombinedStatus>) -> CiStatus {
    if !check_runs.all_passed() {
        return CiStatus::Failure;
    }
    let Some(status) = status else {
        return CiStatus::Success;
    };

    match status.state.as_str() {
        "success" => CiStatus::Success,
        "pending" if status.total_count == 0 => CiStatus::Success,
        "pending" => CiStatus::Pending,
        _ => CiStatus::Failure,
    }
}

/// Fetches the CI state of commit `sha` in `org/repo`.
///
/// The commit status is only requested when every check run passed.
pub(crate) async fn fetch_ci_status(
    octocrab: &Octocrab,
    org: &str,
    repo: &str,
    sha: &str,
) -> Result<CiStatus, octocrab::Error> {
    let check_runs: CheckRuns = octocrab
        .get(
            format!("/repos/{org}/{repo}/commits/{sha}/check-runs"),
            Some(&[("per_page", CHECK_RUNS_PER_PAGE)]),
        )
        .await?;
    if !check_runs.all_passed() {
        debug!(sha, total = check_runs.total_count, "Check runs did not all pass");
        return Ok(combine(&check_runs, None));
    }

    let status: CombinedStatus = octocrab
        .get(format!("/repos/{org}/{repo}/commits/{sha}/status"), None::<&()>)
        .await?;
    Ok(combine(&check_runs, Some(&status)))
}
