//! Core data types and configuration for chronomap.

use geo::Point;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// One recorded event in an entity's location history.
///
/// Entries are immutable once ingested. Multiple entries may share a `name`;
/// for resolution they are ordered by `year` with ties keeping input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entity identifier. Rows with an empty name never reach the store.
    pub name: String,
    /// Event year. Rows whose year does not parse never reach the store.
    pub year: i32,
    pub lat: f64,
    pub lon: f64,
    /// Display label for the location.
    pub place: String,
    /// Free-text annotation; may carry stop / terminal keywords.
    pub info: String,
}

impl HistoryEntry {
    /// Geographic position as a `geo` point (x = lon, y = lat).
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

/// The single location a query decides to display for an entity, copied from
/// the winning [`HistoryEntry`].
///
/// Recomputed fresh per `(year, filter)` query; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub place: String,
    pub info: String,
}

impl ResolvedLocation {
    /// Geographic position as a `geo` point (x = lon, y = lat).
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl From<&HistoryEntry> for ResolvedLocation {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            lat: entry.lat,
            lon: entry.lon,
            place: entry.place.clone(),
            info: entry.info.clone(),
        }
    }
}

/// Engine configuration.
///
/// The status vocabulary is locale-specific free text, so the keyword lists
/// are configurable rather than baked in. Matching is case-insensitive
/// substring containment over the entry's `info` field.
///
/// # Example
///
/// ```rust
/// use chronomap::Config;
///
/// let json = r#"{
///     "stop_keywords": ["stop", "arrêt"],
///     "final_keywords": ["décès", "divorce"]
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.stop_keywords.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Keywords marking a stop event (freezes the entity's displayed state).
    #[serde(default = "Config::default_stop_keywords")]
    pub stop_keywords: Vec<String>,

    /// Keywords marking a terminal event (visible only in its exact year,
    /// suppressing the entity afterwards).
    #[serde(default = "Config::default_final_keywords")]
    pub final_keywords: Vec<String>,

    /// Image used for entities without a photo entry.
    #[serde(default = "Config::default_photo_url")]
    pub default_photo: String,

    /// Image used for the anchor marker of a co-located cluster.
    #[serde(default = "Config::default_group_photo_url")]
    pub group_photo: String,
}

impl Config {
    fn default_stop_keywords() -> Vec<String> {
        vec!["stop".to_string()]
    }

    fn default_final_keywords() -> Vec<String> {
        vec![
            "décès".to_string(),
            "deceased".to_string(),
            "divorce".to_string(),
        ]
    }

    fn default_photo_url() -> String {
        "images/default.jpg".to_string()
    }

    fn default_group_photo_url() -> String {
        "images/group.jpg".to_string()
    }

    /// Replace the stop keyword list.
    pub fn with_stop_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the terminal keyword list.
    pub fn with_final_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.final_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.stop_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("Stop keywords must be non-empty".to_string());
        }
        if self.final_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err("Final keywords must be non-empty".to_string());
        }
        if self.default_photo.is_empty() {
            return Err("Default photo reference must be non-empty".to_string());
        }
        if self.group_photo.is_empty() {
            return Err("Group photo reference must be non-empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_keywords: Self::default_stop_keywords(),
            final_keywords: Self::default_final_keywords(),
            default_photo: Self::default_photo_url(),
            group_photo: Self::default_group_photo_url(),
        }
    }
}
