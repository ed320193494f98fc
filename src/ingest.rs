//! Ingestion: decode the three CSV sheets into the record store.
//!
//! Decoding contract: the first line names fields, subsequent lines are
//! comma-separated values mapped positionally to headers, and a field absent
//! in a row is the empty string. Malformed rows (empty name, non-integer
//! year) are dropped, never fatal; an unreachable sheet is fatal to
//! initialization.

use crate::error::Result;
use crate::store::{GroupMap, PhotoMap, RecordStore};
use crate::types::HistoryEntry;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::path::PathBuf;

/// Provider of the three raw CSV sheets.
///
/// The reference deployment publishes them as three spreadsheet tabs; any
/// transport that yields their text can back the engine.
pub trait SheetSource {
    /// The location-history sheet.
    fn entries(&self) -> Result<String>;
    /// The name → photo URL sheet.
    fn photos(&self) -> Result<String>;
    /// The group label → members sheet.
    fn groups(&self) -> Result<String>;
}

/// Sheet source reading the three CSV files from disk.
#[derive(Debug, Clone)]
pub struct FsSheetSource {
    entries_path: PathBuf,
    photos_path: PathBuf,
    groups_path: PathBuf,
}

impl FsSheetSource {
    pub fn new(
        entries_path: impl Into<PathBuf>,
        photos_path: impl Into<PathBuf>,
        groups_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            entries_path: entries_path.into(),
            photos_path: photos_path.into(),
            groups_path: groups_path.into(),
        }
    }
}

impl SheetSource for FsSheetSource {
    fn entries(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.entries_path)?)
    }

    fn photos(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.photos_path)?)
    }

    fn groups(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.groups_path)?)
    }
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> &'r str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

/// Decode the location-history sheet.
///
/// Rows with an empty `name` or a non-integer `year` are dropped (logged at
/// debug level). `lat`/`lon` parse as floating point; an unparseable
/// coordinate becomes `NaN` rather than dropping the row.
pub fn parse_entries(text: &str) -> Result<Vec<HistoryEntry>> {
    let mut rdr = reader(text);
    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (name_col, year_col) = (col("name"), col("year"));
    let (lat_col, lon_col) = (col("lat"), col("lon"));
    let (place_col, info_col) = (col("place"), col("info"));

    let mut entries = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let name = field(&record, name_col);
        if name.is_empty() {
            log::debug!("dropping history row without a name: {:?}", record);
            continue;
        }
        let year = match field(&record, year_col).parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                log::debug!("dropping history row for '{name}' with non-integer year");
                continue;
            }
        };
        entries.push(HistoryEntry {
            name: name.to_string(),
            year,
            lat: field(&record, lat_col).parse().unwrap_or(f64::NAN),
            lon: field(&record, lon_col).parse().unwrap_or(f64::NAN),
            place: field(&record, place_col).to_string(),
            info: field(&record, info_col).to_string(),
        });
    }
    Ok(entries)
}

/// Decode the photo sheet: first column is the entity name, second the image
/// URL. Rows without a URL keep the engine-wide fallback.
pub fn parse_photo_map(text: &str) -> Result<PhotoMap> {
    let mut rdr = reader(text);
    let mut photos = PhotoMap::new();
    for record in rdr.records() {
        let record = record?;
        let name = field(&record, Some(0));
        if name.is_empty() {
            continue;
        }
        photos.insert(name, field(&record, Some(1)));
    }
    Ok(photos)
}

/// Decode the group sheet: first column is the group label, second a
/// `;`-separated member list. Rows missing either column are skipped.
pub fn parse_group_map(text: &str) -> Result<GroupMap> {
    let mut rdr = reader(text);
    let mut groups = GroupMap::new();
    for record in rdr.records() {
        let record = record?;
        let label = field(&record, Some(0));
        let members = field(&record, Some(1));
        if label.is_empty() || members.is_empty() {
            log::debug!("skipping incomplete group row: {:?}", record);
            continue;
        }
        let members: Vec<String> = members
            .split(';')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        groups.insert(label, members);
    }
    Ok(groups)
}

/// Load all three sheets and build the record store.
pub fn load_store<S: SheetSource>(source: &S) -> Result<RecordStore> {
    let entries = parse_entries(&source.entries()?)?;
    let photos = parse_photo_map(&source.photos()?)?;
    let groups = parse_group_map(&source.groups()?)?;
    log::info!(
        "loaded {} history entries, {} photos, {} groups",
        entries.len(),
        photos.len(),
        groups.len()
    );
    Ok(RecordStore::new(entries, photos, groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRIES_CSV: &str = "\
name,year,lat,lon,place,info
Anne,1990,48.8566,2.3522,Paris,
Anne,2005,45.7640,4.8357,Lyon,stop
Bruno,1988,50.8503,4.3517,Bruxelles,
,1990,1.0,2.0,Nulle part,
Chloé,pas-un-nombre,1.0,2.0,Nulle part,
Bruno,2000,52.5200,13.4050,Berlin,décès
";

    #[test]
    fn test_parse_entries_drops_malformed_rows() {
        let entries = parse_entries(ENTRIES_CSV).unwrap();
        // Empty-name and non-integer-year rows are gone.
        assert_eq!(entries.len(), 4);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Anne", "Anne", "Bruno", "Bruno"]);
        assert_eq!(entries[0].year, 1990);
        assert_eq!(entries[0].place, "Paris");
        assert_eq!(entries[1].info, "stop");
        assert!((entries[2].lat - 50.8503).abs() < 1e-9);
    }

    #[test]
    fn test_parse_entries_missing_fields_are_empty() {
        let entries = parse_entries("name,year,lat,lon,place,info\nAnne,1990\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].place, "");
        assert_eq!(entries[0].info, "");
        assert!(entries[0].lat.is_nan());
        assert!(entries[0].lon.is_nan());
    }

    #[test]
    fn test_parse_entries_header_order_is_positional() {
        let entries =
            parse_entries("year,name,info,lat,lon,place\n1990,Anne,stop,1.5,2.5,Paris\n").unwrap();
        assert_eq!(entries[0].name, "Anne");
        assert_eq!(entries[0].year, 1990);
        assert_eq!(entries[0].lat, 1.5);
        assert_eq!(entries[0].info, "stop");
    }

    #[test]
    fn test_parse_entries_values_are_trimmed() {
        let entries = parse_entries("name,year,lat,lon,place,info\n Anne , 1990 ,1,2, Paris ,\n")
            .unwrap();
        assert_eq!(entries[0].name, "Anne");
        assert_eq!(entries[0].place, "Paris");
    }

    #[test]
    fn test_parse_photo_map() {
        let photos = parse_photo_map(
            "name,url\nAnne,images/anne.jpg\nBruno,\nGroupe,images/famille.jpg\n",
        )
        .unwrap();
        assert_eq!(photos.url_for("Anne"), Some("images/anne.jpg"));
        assert_eq!(photos.url_for("Bruno"), None);
        assert_eq!(photos.group_url(), Some("images/famille.jpg"));
    }

    #[test]
    fn test_parse_group_map() {
        let groups = parse_group_map(
            "group,members\nFamille,Anne;Bruno\nAmis, Bruno ; Chloé \nVide,\n",
        )
        .unwrap();
        assert_eq!(groups.labels(), &["Famille", "Amis"]);
        assert_eq!(groups.members_of("Famille").unwrap(), &["Anne", "Bruno"]);
        assert_eq!(groups.members_of("Amis").unwrap(), &["Bruno", "Chloé"]);
        assert!(groups.members_of("Vide").is_none());
    }

    #[test]
    fn test_load_store_groups_entries_by_entity() {
        struct Inline;
        impl SheetSource for Inline {
            fn entries(&self) -> Result<String> {
                Ok(ENTRIES_CSV.to_string())
            }
            fn photos(&self) -> Result<String> {
                Ok("name,url\n".to_string())
            }
            fn groups(&self) -> Result<String> {
                Ok("group,members\n".to_string())
            }
        }

        let store = load_store(&Inline).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries_for("Anne").unwrap().len(), 2);
        assert_eq!(store.entries_for("Bruno").unwrap().len(), 2);
    }
}
