//! Review queue assembly.

use crate::classify::{Category, ClassifiedPullRequest};
use serde::Serialize;
use std::collections::BTreeMap;

/// Classified pull requests grouped by category.
///
/// A queue produced by [`build`] always holds a (possibly empty) section for
/// every [`Category`]. Sections iterate in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Queue {
    sections: BTreeMap<Category, Vec<ClassifiedPullRequest>>,
}

impl Queue {
    /// Builds a queue from explicit sections, without adding missing ones.
    #[must_use]
    pub fn from_sections(
        sections: impl IntoIterator<Item = (Category, Vec<ClassifiedPullRequest>)>,
    ) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    /// Entries of a category, or `None` if the section is missing.
    #[must_use]
    pub fn section(&self, category: Category) -> Option<&[ClassifiedPullRequest]> {
        self.sections.get(&category).map(Vec::as_slice)
    }

    /// All sections in report order.
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[ClassifiedPullRequest])> {
        self.sections
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Returns true if no section has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }
}

/// Groups classified pull requests into a [`Queue`].
///
/// Entries are ordered by repository name, then creation time (oldest
/// first), then number. The sort is stable, so equal keys keep their
/// discovery order.
#[must_use]
pub fn build(classified: Vec<ClassifiedPullRequest>) -> Queue {
    let mut sections: BTreeMap<Category, Vec<ClassifiedPullRequest>> = Category::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();

    for entry in classified {
        sections.entry(entry.category).or_default().push(entry);
    }

    for entries in sections.values_mut() {
        entries.sort_by(|a, b| {
            let a = &a.pull_request;
            let b = &b.pull_request;
            a.repository
                .cmp(&b.repository)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.number.cmp(&b.number))
        });
    }

    Queue { sections }
}
