//! Pipeline orchestration: filter → resolve → cluster per UI query.

use crate::cluster::{self, PlacementUnit};
use crate::error::Result;
use crate::filter;
use crate::ingest::{self, SheetSource};
use crate::resolver::{self, InfoClassifier};
use crate::store::RecordStore;
use crate::types::Config;
use chrono::{Datelike, Utc};
use std::cell::Cell;

/// The placements computed for one `(year, filter)` query.
///
/// `generation` increases monotonically per query. Rendering is destructive
/// to the previous marker set, so an adapter resolving icons asynchronously
/// must compare a completion's generation against the latest one and discard
/// stale results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub generation: u64,
    pub year: i32,
    pub units: Vec<PlacementUnit>,
}

/// The temporal-state resolution and spatial-clustering engine.
///
/// Holds the write-once record store; every query recomputes its result from
/// scratch as a pure function of `(year, filter, store)`. Single-threaded by
/// design: the generation counter lives in a [`Cell`], so the engine is
/// deliberately not `Sync`.
///
/// # Example
///
/// ```rust
/// use chronomap::{Config, Engine, HistoryEntry, RecordStore};
/// use chronomap::{GroupMap, PhotoMap};
///
/// let entries = vec![HistoryEntry {
///     name: "Anne".to_string(),
///     year: 1990,
///     lat: 48.8566,
///     lon: 2.3522,
///     place: "Paris".to_string(),
///     info: String::new(),
/// }];
/// let store = RecordStore::new(entries, PhotoMap::new(), GroupMap::new());
/// let engine = Engine::new(store, Config::default());
///
/// let result = engine.query(2000, &[]);
/// assert_eq!(result.units.len(), 1);
/// ```
#[derive(Debug)]
pub struct Engine {
    store: RecordStore,
    config: Config,
    classifier: InfoClassifier,
    generation: Cell<u64>,
}

impl Engine {
    /// Create an engine over an already-built record store.
    pub fn new(store: RecordStore, config: Config) -> Self {
        let classifier = InfoClassifier::new(&config);
        Self {
            store,
            config,
            classifier,
            generation: Cell::new(0),
        }
    }

    /// Load the record store from a sheet source and create the engine.
    ///
    /// An unreachable or undecodable sheet is fatal: it is logged once and
    /// returned; the pipeline never runs.
    pub fn load<S: SheetSource>(source: &S, config: Config) -> Result<Self> {
        let store = ingest::load_store(source).inspect_err(|e| {
            log::error!("ingestion failed, engine not initialized: {e}");
        })?;
        Ok(Self::new(store, config))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generation of the most recent query (0 before the first query).
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Slider bounds: the minimum observed year up to the maximum observed
    /// year or the current calendar year, whichever is larger. `None` when
    /// the store holds no entries.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let (min, max) = self.store.observed_year_range()?;
        Some((min, max.max(Utc::now().year())))
    }

    /// Compute the placement units for a query year and group selection.
    ///
    /// Composes the filter engine, the temporal resolver (restricted to
    /// eligible names, in store entity order) and spatial clustering. The
    /// computation is side-effect-free on the data model and idempotent:
    /// only the generation token differs between identical calls. The UI's
    /// "clear selection" action is a call with an empty group slice.
    pub fn query(&self, year: i32, selected_groups: &[String]) -> QueryResult {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let selection = filter::eligible_names(selected_groups, self.store.groups());
        let resolved = resolver::resolve_all(&self.classifier, &self.store, year, &selection);
        let units = cluster::cluster(resolved);

        log::debug!(
            "query #{generation} year={year} groups={} -> {} units",
            selected_groups.len(),
            units.len()
        );
        QueryResult {
            generation,
            year,
            units,
        }
    }
}
