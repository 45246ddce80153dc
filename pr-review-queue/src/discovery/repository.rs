//! Discovered repository information.

use serde::Serialize;

/// A repository found while enumerating an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredRepository {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Whether the repository is archived.
    pub archived: bool,

    /// Whether the repository is disabled.
    pub disabled: bool,
}

impl DiscoveredRepository {
    /// Creates an active repository entry.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        Self {
            full_name: format!("{owner}/{name}"),
            owner,
            name,
            archived: false,
            disabled: false,
        }
    }

    /// Whether pull requests of this repository should be collected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.archived && !self.disabled
    }
}
