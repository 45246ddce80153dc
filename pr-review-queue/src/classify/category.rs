//! Review queue categories.

use serde::{Deserialize, Serialize};

/// The section a pull request is sorted into.
///
/// Declaration order is the order sections appear in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// A reviewer asked for changes; the author has to act.
    ChangesRequested,
    /// Waiting for (or without) reviewers.
    AwaitingReview,
    /// Every requested reviewer approved; the author can merge.
    ApprovedReady,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 3] = [
        Category::ChangesRequested,
        Category::AwaitingReview,
        Category::ApprovedReady,
    ];

    /// Section title shown in the report.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::ChangesRequested => "We need changes",
            Self::AwaitingReview => "We need a review",
            Self::ApprovedReady => "Ready to merge",
        }
    }

    /// Slack emoji shown before the title.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::ChangesRequested => ":construction:",
            Self::AwaitingReview => ":eyes:",
            Self::ApprovedReady => ":white_check_mark:",
        }
    }

    /// Words placed before the mentions of an entry.
    #[must_use]
    pub fn addressee_phrase(self) -> &'static str {
        match self {
            Self::ChangesRequested => "needs changes by",
            Self::AwaitingReview => "waiting for",
            Self::ApprovedReady => "can be merged by",
        }
    }

    /// Stable identifier, used in logs and summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChangesRequested => "changes-requested",
            Self::AwaitingReview => "awaiting-review",
            Self::ApprovedReady => "approved-ready",
        }
    }

    /// Looks a category up by its section title.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.title() == title)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
