//! Temporal resolution: each entity's displayed location at a query year.
//!
//! An entity's displayed status is "last known good position, unless a stop
//! or terminal event has occurred on or before the query year", with terminal
//! events given a one-year visibility window at their exact occurrence year.
//! This is a point-in-time state machine per entity, not a latest-entry
//! lookup.

use crate::filter::Selection;
use crate::store::RecordStore;
use crate::types::{Config, HistoryEntry, ResolvedLocation};

/// Classification of one entry's `info` text.
///
/// The two flags are independent: free text may carry both a stop keyword and
/// a terminal keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfoClass {
    /// The text contains a stop keyword.
    pub stop: bool,
    /// The text contains a terminal-event keyword (death, separation, ...).
    pub terminal: bool,
}

/// Case-insensitive keyword matcher over entry annotations.
///
/// Keyword lists come from [`Config`]; they are lowercased once here so each
/// classification is a plain substring scan.
#[derive(Debug, Clone)]
pub struct InfoClassifier {
    stop_keywords: Vec<String>,
    final_keywords: Vec<String>,
}

impl InfoClassifier {
    pub fn new(config: &Config) -> Self {
        Self {
            stop_keywords: config
                .stop_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            final_keywords: config
                .final_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, info: &str) -> InfoClass {
        let info = info.to_lowercase();
        InfoClass {
            stop: self.stop_keywords.iter().any(|k| info.contains(k)),
            terminal: self.final_keywords.iter().any(|k| info.contains(k)),
        }
    }
}

impl Default for InfoClassifier {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Resolution state of one entity while walking its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityState {
    Active,
    Stopped,
}

/// Resolve one entity's current location at `year`.
///
/// `entries` is the entity's full history in input order. The walk:
///
/// 1. Keep entries with `entry.year <= year`, stable-sorted ascending by year
///    (ties keep input order).
/// 2. Per entry, classify its `info`. A stop keyword moves the entity to
///    `Stopped`. While `Active`, an entry that is neither stop nor terminal
///    becomes the candidate. A terminal entry at exactly the query year
///    becomes the candidate; a terminal entry strictly before the query year
///    moves the entity to `Stopped`. Stop/candidate logic applies before
///    terminal logic within a single entry, so an entry that is itself
///    terminal at the query year is shown even though it suppresses all
///    later years.
/// 3. `Stopped` at the end of the walk means no resolved location.
pub fn resolve(
    classifier: &InfoClassifier,
    entries: &[HistoryEntry],
    year: i32,
) -> Option<ResolvedLocation> {
    let mut timeline: Vec<&HistoryEntry> = entries.iter().filter(|e| e.year <= year).collect();
    timeline.sort_by_key(|e| e.year);

    let mut state = EntityState::Active;
    let mut candidate: Option<&HistoryEntry> = None;

    for entry in timeline {
        let class = classifier.classify(&entry.info);
        if class.stop {
            state = EntityState::Stopped;
        }
        if state == EntityState::Active && !class.terminal {
            candidate = Some(entry);
        }
        if class.terminal {
            if entry.year == year {
                candidate = Some(entry);
            }
            if entry.year < year {
                state = EntityState::Stopped;
            }
        }
    }

    match state {
        EntityState::Active => candidate.map(ResolvedLocation::from),
        EntityState::Stopped => None,
    }
}

/// Resolve every eligible entity in the store, in store entity order.
///
/// Resolution is per-entity and independent: one entity's record never
/// affects another's outcome. Entities outside `selection` are never
/// evaluated.
pub fn resolve_all(
    classifier: &InfoClassifier,
    store: &RecordStore,
    year: i32,
    selection: &Selection,
) -> Vec<ResolvedLocation> {
    store
        .entities()
        .filter(|record| selection.allows(record.name()))
        .filter_map(|record| resolve(classifier, record.entries(), year))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GroupMap, PhotoMap};

    fn entry(name: &str, year: i32, info: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            year,
            lat: year as f64,
            lon: -(year as f64),
            place: format!("place-{year}"),
            info: info.to_string(),
        }
    }

    fn resolve_default(entries: &[HistoryEntry], year: i32) -> Option<ResolvedLocation> {
        resolve(&InfoClassifier::default(), entries, year)
    }

    #[test]
    fn test_classifier_case_insensitive() {
        let classifier = InfoClassifier::default();
        assert_eq!(
            classifier.classify("STOP ici"),
            InfoClass {
                stop: true,
                terminal: false
            }
        );
        assert_eq!(
            classifier.classify("Décès à Lyon"),
            InfoClass {
                stop: false,
                terminal: true
            }
        );
        assert_eq!(classifier.classify("rien"), InfoClass::default());
    }

    #[test]
    fn test_classifier_both_flags() {
        let classifier = InfoClassifier::default();
        let class = classifier.classify("stop après divorce");
        assert!(class.stop);
        assert!(class.terminal);
    }

    #[test]
    fn test_latest_entry_wins() {
        let entries = vec![entry("A", 1990, ""), entry("A", 2000, "")];
        let loc = resolve_default(&entries, 2005).unwrap();
        assert_eq!(loc.year_marker(), 2000);
    }

    #[test]
    fn test_future_entries_ignored() {
        let entries = vec![entry("A", 1990, ""), entry("A", 2010, "")];
        let loc = resolve_default(&entries, 2000).unwrap();
        assert_eq!(loc.year_marker(), 1990);
    }

    #[test]
    fn test_no_qualifying_entries() {
        let entries = vec![entry("A", 2010, "")];
        assert!(resolve_default(&entries, 2000).is_none());
        assert!(resolve_default(&[], 2000).is_none());
    }

    #[test]
    fn test_stop_hides_entity_and_later_entries_do_not_revive() {
        let entries = vec![
            entry("A", 2000, ""),
            entry("A", 2005, "stop"),
            entry("A", 2010, ""),
        ];
        assert!(resolve_default(&entries, 2012).is_none());
        // Before the stop, the 2000 entry is still shown.
        assert_eq!(resolve_default(&entries, 2004).unwrap().year_marker(), 2000);
    }

    #[test]
    fn test_terminal_visible_only_in_its_exact_year() {
        let entries = vec![entry("B", 1990, ""), entry("B", 2000, "deceased")];
        assert_eq!(resolve_default(&entries, 1995).unwrap().year_marker(), 1990);
        assert_eq!(resolve_default(&entries, 2000).unwrap().year_marker(), 2000);
        assert!(resolve_default(&entries, 2001).is_none());
        assert!(resolve_default(&entries, 2050).is_none());
    }

    #[test]
    fn test_terminal_entry_never_becomes_candidate_early() {
        // A terminal entry before the query year suppresses; it is not a
        // "last known good" position.
        let entries = vec![entry("B", 2000, "divorce")];
        assert!(resolve_default(&entries, 2005).is_none());
        assert_eq!(resolve_default(&entries, 2000).unwrap().year_marker(), 2000);
    }

    #[test]
    fn test_prior_stop_beats_terminal_window() {
        // Stopped before the terminal year: the exact-year window does not
        // re-show the entity.
        let entries = vec![entry("A", 1995, "stop"), entry("A", 2000, "décès")];
        assert!(resolve_default(&entries, 2000).is_none());
    }

    #[test]
    fn test_same_year_ties_keep_input_order() {
        let mut first = entry("A", 2000, "");
        first.place = "first".to_string();
        let mut second = entry("A", 2000, "");
        second.place = "second".to_string();

        let loc = resolve_default(&[first, second], 2000).unwrap();
        assert_eq!(loc.place, "second");
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_year() {
        let entries = vec![entry("A", 2005, ""), entry("A", 1990, "")];
        let loc = resolve_default(&entries, 2010).unwrap();
        assert_eq!(loc.year_marker(), 2005);
    }

    #[test]
    fn test_custom_keywords() {
        let config = Config::default()
            .with_stop_keywords(["gestoppt"])
            .with_final_keywords(["verstorben"]);
        let classifier = InfoClassifier::new(&config);

        let entries = vec![entry("A", 1990, ""), entry("A", 2000, "Gestoppt")];
        assert!(resolve(&classifier, &entries, 2005).is_none());
        // Default keywords are not recognized by the custom classifier.
        let entries = vec![entry("A", 2000, "stop")];
        assert!(resolve(&classifier, &entries, 2005).is_some());
    }

    #[test]
    fn test_resolve_all_respects_selection_and_order() {
        let store = RecordStore::new(
            vec![
                entry("B", 1990, ""),
                entry("A", 1990, ""),
                entry("C", 1990, ""),
            ],
            PhotoMap::new(),
            GroupMap::new(),
        );
        let classifier = InfoClassifier::default();

        let all = resolve_all(&classifier, &store, 2000, &Selection::All);
        let names: Vec<&str> = all.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);

        let only = Selection::of_names(["A", "C"]);
        let some = resolve_all(&classifier, &store, 2000, &only);
        let names: Vec<&str> = some.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    impl ResolvedLocation {
        /// Test helper: entries in these tests encode their year in `lat`.
        fn year_marker(&self) -> i32 {
            self.lat as i32
        }
    }
}
