//! Temporal-state resolution and spatial clustering for historical location maps.
//!
//! Given a query year and an optional group filter, chronomap resolves each
//! tracked entity's single current location — honoring stop and terminal
//! events embedded in the record — and clusters co-located entities into
//! placement units with deterministic sub-offsets, ready for a map adapter
//! to draw.
//!
//! ```rust
//! use chronomap::{Config, Engine, GroupMap, HistoryEntry, PhotoMap, RecordStore};
//!
//! let entries = vec![
//!     HistoryEntry {
//!         name: "Anne".to_string(),
//!         year: 1990,
//!         lat: 48.8566,
//!         lon: 2.3522,
//!         place: "Paris".to_string(),
//!         info: String::new(),
//!     },
//!     HistoryEntry {
//!         name: "Anne".to_string(),
//!         year: 2005,
//!         lat: 45.7640,
//!         lon: 4.8357,
//!         place: "Lyon".to_string(),
//!         info: "stop".to_string(),
//!     },
//! ];
//! let store = RecordStore::new(entries, PhotoMap::new(), GroupMap::new());
//! let engine = Engine::new(store, Config::default());
//!
//! // Before the stop event Anne is shown at her last known position.
//! let result = engine.query(2000, &[]);
//! assert_eq!(result.units[0].members()[0].place, "Paris");
//!
//! // From the stop year onward she is hidden.
//! assert!(engine.query(2010, &[]).units.is_empty());
//! ```

pub mod cluster;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod render;
pub mod resolver;
pub mod store;
pub mod types;

pub use engine::{Engine, QueryResult};
pub use error::{ChronomapError, Result};

pub use geo::Point;

pub use cluster::{CoordKey, MEMBER_OFFSET_STEP, PlacementUnit, cluster, coord_key};
pub use filter::{Selection, eligible_names};
pub use ingest::{FsSheetSource, SheetSource};
pub use render::{IconRequest, ImageResolver, Marker, MarkerSink, emit_markers};
pub use resolver::{InfoClass, InfoClassifier, resolve};
pub use store::{EntityRecord, GROUP_PHOTO_KEY, GroupMap, PhotoMap, RecordStore};
pub use types::{Config, HistoryEntry, ResolvedLocation};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ChronomapError, Config, Engine, QueryResult, Result};

    pub use crate::{GroupMap, HistoryEntry, PhotoMap, RecordStore, ResolvedLocation};

    pub use crate::{FsSheetSource, SheetSource};

    pub use crate::{Marker, MarkerSink, PlacementUnit, Point};
}
