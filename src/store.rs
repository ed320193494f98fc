//! The record store: parsed history entries, photo lookup, group membership.
//!
//! Populated once at startup by ingestion, then read-only for the lifetime of
//! the session. Entity iteration order is the input order of the first entry
//! seen for each name; queries and clustering derive their determinism from
//! that order.

use crate::types::HistoryEntry;
use rustc_hash::FxHashMap;

/// Reserved photo-map key for the image shown on a cluster's anchor marker.
pub const GROUP_PHOTO_KEY: &str = "Groupe";

/// All recorded entries for one entity, in input order.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    name: String,
    entries: Vec<HistoryEntry>,
}

impl EntityRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

/// Mapping from entity name to an image reference.
///
/// Absent names fall back to a default reference; the reserved
/// [`GROUP_PHOTO_KEY`] entry, when present, overrides the group image.
#[derive(Debug, Clone, Default)]
pub struct PhotoMap {
    urls: FxHashMap<String, String>,
}

impl PhotoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a photo reference for a name. An empty URL is ignored so the
    /// name keeps its fallback.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let url = url.into();
        if url.is_empty() {
            return;
        }
        self.urls.insert(name.into(), url);
    }

    /// Photo reference for an entity, if one was registered.
    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.urls.get(name).map(String::as_str)
    }

    /// Photo reference for the group anchor marker, if one was registered.
    pub fn group_url(&self) -> Option<&str> {
        self.url_for(GROUP_PHOTO_KEY)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Mapping from group label to an ordered list of member entity names.
///
/// Membership is static after load and many-to-many: an entity may belong to
/// any number of groups. Label iteration order is first-seen input order; a
/// repeated label replaces its member list in place.
#[derive(Debug, Clone, Default)]
pub struct GroupMap {
    labels: Vec<String>,
    members: FxHashMap<String, Vec<String>>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, members: Vec<String>) {
        let label = label.into();
        if !self.members.contains_key(&label) {
            self.labels.push(label.clone());
        }
        self.members.insert(label, members);
    }

    /// Members of a group, or `None` for an unknown label.
    pub fn members_of(&self, label: &str) -> Option<&[String]> {
        self.members.get(label).map(Vec::as_slice)
    }

    /// Group labels in input order (the UI's dropdown order).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Write-once-then-read-only holder for the session's data.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entities: Vec<EntityRecord>,
    index: FxHashMap<String, usize>,
    photos: PhotoMap,
    groups: GroupMap,
}

impl RecordStore {
    /// Build a store from already-validated entries plus the two lookups.
    ///
    /// Entries are grouped by name; entity order is the input order of each
    /// name's first entry, and per-entity entries keep input order.
    pub fn new(entries: Vec<HistoryEntry>, photos: PhotoMap, groups: GroupMap) -> Self {
        let mut store = Self {
            entities: Vec::new(),
            index: FxHashMap::default(),
            photos,
            groups,
        };
        for entry in entries {
            store.push_entry(entry);
        }
        store
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        match self.index.get(&entry.name) {
            Some(&i) => self.entities[i].entries.push(entry),
            None => {
                self.index.insert(entry.name.clone(), self.entities.len());
                self.entities.push(EntityRecord {
                    name: entry.name.clone(),
                    entries: vec![entry],
                });
            }
        }
    }

    /// Tracked entities in input order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.iter()
    }

    /// All entries for one entity, in input order.
    pub fn entries_for(&self, name: &str) -> Option<&[HistoryEntry]> {
        self.index
            .get(name)
            .map(|&i| self.entities[i].entries.as_slice())
    }

    pub fn photos(&self) -> &PhotoMap {
        &self.photos
    }

    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Minimum and maximum year observed across all entries.
    pub fn observed_year_range(&self) -> Option<(i32, i32)> {
        let mut range: Option<(i32, i32)> = None;
        for record in &self.entities {
            for entry in &record.entries {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(entry.year), hi.max(entry.year)),
                    None => (entry.year, entry.year),
                });
            }
        }
        range
    }
}
