//! Repository discovery for organization-wide runs.
//!
//! Lists every repository of an organization and drops the archived and
//! disabled ones, which cannot receive reviews.

mod repository;

pub use repository::DiscoveredRepository;

use crate::pull_requests::FetchError;
use crate::rate_limit::ensure_core_rate_limit;
use octocrab::Octocrab;
use tracing::{debug, info, info_span, Instrument};

/// Results per page for repository listing.
const RESULTS_PER_PAGE: u8 = 100;

/// Discovers the active repositories of an organization.
///
/// Pagination is exhaustive. Archived and disabled repositories are logged
/// and left out of the result.
///
/// # Errors
///
/// Returns [`FetchError::UpstreamUnavailable`] if any listing call fails.
pub async fn discover_repositories(
    octocrab: &Octocrab,
    org: &str,
) -> Result<Vec<DiscoveredRepository>, FetchError> {
    let span = info_span!("discover", org = %org);

    async {
        info!("Listing organization repositories");
        ensure_core_rate_limit(octocrab).await?;

        let first_page = octocrab
            .orgs(org)
            .list_repos()
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;
        let repos = octocrab.all_pages(first_page).await?;

        let discovered = repos
            .into_iter()
            .map(|repo| DiscoveredRepository {
                owner: org.to_string(),
                full_name: format!("{org}/{}", repo.name),
                archived: repo.archived.unwrap_or(false),
                disabled: repo.disabled.unwrap_or(false),
                name: repo.name,
            })
            .collect();

        let active = retain_active(discovered);
        info!(count = active.len(), "Discovery complete");
        Ok(active)
    }
    .instrument(span)
    .await
}

/// Drops archived and disabled repositories, logging the skipped ones.
///
/// Order of the remaining repositories is preserved.
fn retain_active(repositories: Vec<DiscoveredRepository>) -> Vec<DiscoveredRepository> {
    let (active, skipped): (Vec<_>, Vec<_>) = repositories
        .into_iter()
        .partition(DiscoveredRepository::is_active);

    if !skipped.is_empty() {
        let names: Vec<&str> = skipped.iter().map(|repo| repo.name.as_str()).collect();
        info!(
            skipped = %names.join(", "),
            "Ignoring archived or disabled repositories"
        );
    }
    for repo in &active {
        debug!(repo = %repo.full_name, "Discovered repository");
    }

    active
}
