//! Loading of the three read-only inputs: the merged health/wealth CSV, the
//! per-country/year population CSV, and the GeoJSON world boundary file.
//!
//! All loaders follow the same contract: structural problems (unreadable
//! file, malformed container) are typed errors; individual bad rows or
//! features are skipped, counted, and logged at `warn` level.

use crate::models::{PopulationRow, RawRow, Record};
use ahash::AHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural failures while reading input files.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to parse GeoJSON {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} contains no usable rows", path.display())]
    Empty { path: PathBuf },
    #[error("{} is not a GeoJSON FeatureCollection", path.display())]
    NotFeatureCollection { path: PathBuf },
}

/// Load and coerce the merged health/wealth CSV.
///
/// Rows missing a code, year, GDP, or life expectancy are skipped, not fatal.
/// Duplicate `(code, year)` rows collapse to the last one read.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, DatasetError> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut records: Vec<Record> = Vec::new();
    let mut index: AHashMap<(String, i32), usize> = AHashMap::new();
    let mut skipped = 0usize;

    for row in rdr.deserialize::<RawRow>() {
        let Ok(raw) = row else {
            skipped += 1;
            continue;
        };
        let Some(record) = raw.into_record() else {
            skipped += 1;
            continue;
        };
        match index.get(&(record.code.clone(), record.year)) {
            Some(&at) => records[at] = record,
            None => {
                index.insert((record.code.clone(), record.year), records.len());
                records.push(record);
            }
        }
    }

    if skipped > 0 {
        log::warn!("{}: skipped {skipped} incomplete rows", path.display());
    }
    if records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    log::info!("{}: loaded {} records", path.display(), records.len());
    Ok(records)
}

/// Left-join population figures onto already loaded records by `(code, year)`.
/// Records without a matching population row keep `population: None`.
/// Returns the number of records that received a value.
pub fn merge_population<P: AsRef<Path>>(
    records: &mut [Record],
    path: P,
) -> Result<usize, DatasetError> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DatasetError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut by_key: AHashMap<(String, i32), u64> = AHashMap::new();
    for row in rdr.deserialize::<PopulationRow>() {
        let Ok(raw) = row else { continue };
        if let (Some(code), Some(year), Some(pop)) = (raw.code, raw.year, raw.population) {
            let code = code.trim().to_string();
            if !code.is_empty() {
                by_key.insert((code, year), pop);
            }
        }
    }

    let mut matched = 0usize;
    for record in records.iter_mut() {
        if let Some(pop) = by_key.get(&(record.code.clone(), record.year)) {
            record.population = Some(*pop);
            matched += 1;
        }
    }
    log::info!(
        "{}: population matched for {matched} records",
        path.display()
    );
    Ok(matched)
}

// ---------------------------------------------------------------------------
// World boundaries
// ---------------------------------------------------------------------------

/// One country outline: the ISO3 code plus its rings in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub code: String,
    pub name: Option<String>,
    /// Closed rings (exterior and holes alike); each point is `(lon, lat)`.
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// All country outlines of the boundary file, in file order.
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    pub shapes: Vec<CountryShape>,
}

impl WorldMap {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    /// May be absent or `null` in the wild.
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
    geometry: Option<Geometry>,
}

/// Only surface geometries carry a fill; anything else is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Other,
}

const CODE_KEYS: [&str; 4] = ["code", "iso_a3", "ISO_A3", "ADM0_A3"];
const NAME_KEYS: [&str; 4] = ["name", "NAME", "admin", "ADMIN"];

impl Feature {
    fn code(&self) -> Option<String> {
        if let Some(Value::String(id)) = &self.id {
            let id = id.trim();
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
        let props = self.properties.as_ref()?;
        for key in CODE_KEYS {
            if let Some(Value::String(code)) = props.get(key) {
                let code = code.trim();
                if !code.is_empty() {
                    return Some(code.to_string());
                }
            }
        }
        None
    }

    fn name(&self) -> Option<String> {
        let props = self.properties.as_ref()?;
        for key in NAME_KEYS {
            if let Some(Value::String(name)) = props.get(key) {
                return Some(name.clone());
            }
        }
        None
    }
}

fn ring_points(ring: Vec<Vec<f64>>) -> Option<Vec<(f64, f64)>> {
    let pts: Vec<(f64, f64)> = ring
        .into_iter()
        .filter(|p| p.len() >= 2 && p[0].is_finite() && p[1].is_finite())
        .map(|p| (p[0], p[1]))
        .collect();
    // Degenerate rings cannot enclose area.
    (pts.len() >= 3).then_some(pts)
}

/// Load the GeoJSON world boundary file.
///
/// Accepts `Polygon` and `MultiPolygon` features keyed by ISO3 code (feature
/// `id` or a conventional property). Features without a usable code or
/// geometry are skipped and logged.
pub fn load_world<P: AsRef<Path>>(path: P) -> Result<WorldMap, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: FeatureCollection =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if collection.kind != "FeatureCollection" {
        return Err(DatasetError::NotFeatureCollection {
            path: path.to_path_buf(),
        });
    }

    let mut shapes = Vec::new();
    let mut skipped = 0usize;
    for feature in collection.features {
        let Some(code) = feature.code() else {
            skipped += 1;
            continue;
        };
        let name = feature.name();
        let rings: Vec<Vec<(f64, f64)>> = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                coordinates.into_iter().filter_map(ring_points).collect()
            }
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .into_iter()
                .flatten()
                .filter_map(ring_points)
                .collect(),
            _ => {
                skipped += 1;
                continue;
            }
        };
        if rings.is_empty() {
            skipped += 1;
            continue;
        }
        shapes.push(CountryShape { code, name, rings });
    }

    if skipped > 0 {
        log::warn!("{}: skipped {skipped} unusable features", path.display());
    }
    if shapes.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(WorldMap { shapes })
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The loaded records plus the derived lookups the views and controls need.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique country names, for the country dropdown.
    pub fn countries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.country.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Sorted unique years, for the year dropdown.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    /// All records for one year, in load order.
    pub fn for_year(&self, year: i32) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| r.year == year)
            .cloned()
            .collect()
    }

    /// All records for one country, sorted by year.
    pub fn for_country(&self, country: &str) -> Vec<Record> {
        let mut out: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.country == country)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.year);
        out
    }
}
