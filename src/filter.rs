//! Group-based filtering: which entity names a query may display.

use crate::store::GroupMap;
use rustc_hash::FxHashSet;

/// The set of entity names eligible for display.
///
/// `All` is the "no restriction" sentinel; `Names` restricts resolution to
/// the union of the selected groups' members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No filtering: every entity passes.
    All,
    /// Only the named entities pass.
    Names(FxHashSet<String>),
}

impl Selection {
    /// Whether `name` is eligible under this selection.
    pub fn allows(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Names(names) => names.contains(name),
        }
    }

    /// Build a restricted selection from an explicit name list.
    pub fn of_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Names(names.into_iter().map(Into::into).collect())
    }
}

/// Compute the eligible names for a set of selected group labels.
///
/// An empty selection means no filtering. Otherwise the result is the
/// deduplicated union of every selected group's members; unknown labels are
/// silently ignored. A selection whose union ends up empty (every label
/// unknown) also disables filtering rather than hiding everything.
pub fn eligible_names(selected_groups: &[String], groups: &GroupMap) -> Selection {
    if selected_groups.is_empty() {
        return Selection::All;
    }

    let mut names: FxHashSet<String> = FxHashSet::default();
    for label in selected_groups {
        if let Some(members) = groups.members_of(label) {
            names.extend(members.iter().cloned());
        }
    }

    if names.is_empty() {
        Selection::All
    } else {
        Selection::Names(names)
    }
}
