//! Spatial clustering of resolved locations into placement units.
//!
//! Entities whose coordinates land in the same 5-decimal bin (≈1.1 m) are
//! considered co-located and rendered as one unit. Unit and member order are
//! reproducible from the input order, and member offsets are a fixed linear
//! stagger, so repeated invocations over the same input produce identical
//! placements.

use crate::types::ResolvedLocation;
use geo::Point;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Number of decimal places both coordinates are rounded to for the key.
pub const COORD_KEY_DECIMALS: u32 = 5;

/// Offset added to both axes per co-located member index.
pub const MEMBER_OFFSET_STEP: f64 = 0.00005;

const COORD_KEY_SCALE: f64 = 100_000.0; // 10^COORD_KEY_DECIMALS

/// Coordinate key: latitude and longitude rounded to
/// [`COORD_KEY_DECIMALS`] decimal places, as scaled integers.
///
/// Two locations with equal keys are co-located for clustering purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_e5: i64,
    lon_e5: i64,
}

/// Compute the clustering key for a coordinate pair.
pub fn coord_key(lat: f64, lon: f64) -> CoordKey {
    CoordKey {
        lat_e5: (lat * COORD_KEY_SCALE).round() as i64,
        lon_e5: (lon * COORD_KEY_SCALE).round() as i64,
    }
}

/// One visual marker group: a single entity or a co-located cluster.
///
/// The first member's exact (unrounded) coordinates anchor the unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementUnit {
    key: CoordKey,
    members: SmallVec<[ResolvedLocation; 2]>,
}

impl PlacementUnit {
    /// The rounded coordinate key the members share.
    pub fn key(&self) -> CoordKey {
        self.key
    }

    /// Co-located members in input order. Never empty.
    pub fn members(&self) -> &[ResolvedLocation] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether this unit renders as a single individual placement.
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    /// Anchor position: the first member's exact coordinates
    /// (x = lon, y = lat).
    pub fn anchor(&self) -> Point {
        self.members[0].point()
    }

    /// Position of member `index`: the anchor staggered by
    /// `MEMBER_OFFSET_STEP × index` on both axes.
    pub fn member_position(&self, index: usize) -> Point {
        let offset = MEMBER_OFFSET_STEP * index as f64;
        let anchor = &self.members[0];
        Point::new(anchor.lon + offset, anchor.lat + offset)
    }
}

/// Partition resolved locations into placement units by coordinate key.
///
/// Unit order is the first-seen order of each key over `resolved`; member
/// order within a unit is input order.
pub fn cluster(resolved: Vec<ResolvedLocation>) -> Vec<PlacementUnit> {
    let mut units: Vec<PlacementUnit> = Vec::new();
    let mut by_key: FxHashMap<CoordKey, usize> = FxHashMap::default();

    for location in resolved {
        let key = coord_key(location.lat, location.lon);
        match by_key.get(&key) {
            Some(&i) => units[i].members.push(location),
            None => {
                by_key.insert(key, units.len());
                units.push(PlacementUnit {
                    key,
                    members: SmallVec::from_elem(location, 1),
                });
            }
        }
    }

    units
}
