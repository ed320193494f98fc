//! The marker-placement seam between the engine and a rendering surface.
//!
//! The core never draws. It hands each placement unit to a [`MarkerSink`] as
//! one or more [`Marker`]s; the adapter owns actual drawing, click-to-expand
//! for co-located clusters, and clearing the previous marker set. Icon URLs
//! are resolved behind [`ImageResolver`], and resolutions may complete
//! asynchronously and out of order: every sink call carries the query
//! generation so late completions from a superseded query can be discarded.

use crate::cluster::PlacementUnit;
use crate::engine::QueryResult;
use crate::store::PhotoMap;
use crate::types::{Config, ResolvedLocation};
use geo::Point;

/// A preferred image reference plus the fallback to use if it fails to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    pub preferred: String,
    pub fallback: String,
}

/// One marker handed to the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position on the map (x = lon, y = lat).
    pub position: Point,
    pub icon: IconRequest,
    /// Popup body, absent on a cluster's anchor marker.
    pub popup: Option<String>,
}

/// Image-existence check with fallback.
///
/// Implementations must be infallible: a reference that cannot be loaded
/// resolves to the request's fallback, never to an error. Each placement's
/// icon resolves independently, so one slow or failing lookup must not delay
/// other placements.
pub trait ImageResolver {
    fn resolve(&self, request: &IconRequest) -> String;
}

impl<F> ImageResolver for F
where
    F: Fn(&IconRequest) -> String,
{
    fn resolve(&self, request: &IconRequest) -> String {
        self(request)
    }
}

/// Destination for the markers of one query.
///
/// `clear` is called once per emission, before any placement: drawing is
/// destructive to the previous marker set. The `generation` argument is the
/// query's generation token; an adapter whose icon resolutions complete after
/// a newer `clear` must drop them.
pub trait MarkerSink {
    fn clear(&mut self, generation: u64);
    fn place(&mut self, generation: u64, marker: Marker);
}

/// Icon request for an entity: its photo entry, or the default reference.
pub fn icon_for(photos: &PhotoMap, config: &Config, name: &str) -> IconRequest {
    IconRequest {
        preferred: photos
            .url_for(name)
            .unwrap_or(&config.default_photo)
            .to_string(),
        fallback: config.default_photo.clone(),
    }
}

/// Icon request for a cluster's anchor marker.
pub fn group_icon(photos: &PhotoMap, config: &Config) -> IconRequest {
    IconRequest {
        preferred: photos
            .group_url()
            .unwrap_or(&config.group_photo)
            .to_string(),
        fallback: config.default_photo.clone(),
    }
}

/// Popup body for a resolved location: name, place, annotation.
pub fn popup_text(location: &ResolvedLocation) -> String {
    format!("{}\n{}\n{}", location.name, location.place, location.info)
}

/// Markers for one placement unit.
///
/// A unit of size 1 yields a single marker at the exact coordinate. A larger
/// unit yields a group marker at the anchor plus one staggered marker per
/// member.
pub fn unit_markers(unit: &PlacementUnit, photos: &PhotoMap, config: &Config) -> Vec<Marker> {
    if unit.is_single() {
        let member = &unit.members()[0];
        return vec![Marker {
            position: unit.anchor(),
            icon: icon_for(photos, config, &member.name),
            popup: Some(popup_text(member)),
        }];
    }

    let mut markers = Vec::with_capacity(unit.len() + 1);
    markers.push(Marker {
        position: unit.anchor(),
        icon: group_icon(photos, config),
        popup: None,
    });
    for (index, member) in unit.members().iter().enumerate() {
        markers.push(Marker {
            position: unit.member_position(index),
            icon: icon_for(photos, config, &member.name),
            popup: Some(popup_text(member)),
        });
    }
    markers
}

/// Drive a sink with the full marker set of one query result.
pub fn emit_markers<S: MarkerSink>(
    sink: &mut S,
    result: &QueryResult,
    photos: &PhotoMap,
    config: &Config,
) {
    sink.clear(result.generation);
    for unit in &result.units {
        for marker in unit_markers(unit, photos, config) {
            sink.place(result.generation, marker);
        }
    }
}
