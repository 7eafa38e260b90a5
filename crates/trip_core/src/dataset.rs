//! Dataset loading: fetch a feature-collection document from a file, reader,
//! or URL and turn it into validated [`TripRecord`]s.
//!
//! The document shape is the one the trip exporter produces:
//!
//! ```text
//! { "features": [ { "geometry":   { "coordinates": [[lon, lat], ...] },
//!                   "properties": { "tripid", "taxiid", "distance",
//!                                   "avspeed", "streetnames" } } ] }
//! ```
//!
//! Features whose coordinate path has fewer than two points are skipped
//! silently. Missing or negative `distance`/`avspeed` values are normalized
//! to 0.0 so no NaN ever reaches aggregation or rendering.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::trips::{LonLat, TaxiId, TripId, TripRecord};

/// The single error kind of the loading stage. Anything that goes wrong
/// before a dataset is fully in memory ends up here; afterwards the data is
/// immutable and infallible to read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed trip collection: {0}")]
    Parse(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("fetch failed: status {0}")]
    HttpStatus(reqwest::StatusCode),
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
    properties: Properties,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct Properties {
    tripid: IdValue,
    taxiid: IdValue,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    avspeed: Option<f64>,
    #[serde(default)]
    streetnames: Vec<Option<String>>,
}

/// Identifiers appear as strings in some exports and bare numbers in others.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(serde_json::Number),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(text) => text,
            IdValue::Number(number) => number.to_string(),
        }
    }
}

/// Load trips from a JSON string.
pub fn load_trips_str(json: &str) -> Result<Vec<TripRecord>, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    Ok(records_from_collection(collection))
}

/// Load trips from any reader.
pub fn load_trips_reader<R: Read>(reader: R) -> Result<Vec<TripRecord>, LoadError> {
    let collection: FeatureCollection = serde_json::from_reader(reader)?;
    Ok(records_from_collection(collection))
}

/// Load trips from a file on disk.
pub fn load_trips_file<P: AsRef<Path>>(path: P) -> Result<Vec<TripRecord>, LoadError> {
    let file = File::open(path)?;
    load_trips_reader(BufReader::new(file))
}

/// Fetch trips over HTTP(S). Non-success statuses are errors; there is no
/// retry, a failed fetch simply means nothing renders.
#[cfg(feature = "http")]
pub fn load_trips_url(url: &str) -> Result<Vec<TripRecord>, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let response = client.get(url).send()?;
    if !response.status().is_success() {
        return Err(LoadError::HttpStatus(response.status()));
    }
    let body = response.text()?;
    load_trips_str(&body)
}

fn records_from_collection(collection: FeatureCollection) -> Vec<TripRecord> {
    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;
    for feature in collection.features {
        let path: Vec<LonLat> = feature
            .geometry
            .map(|geometry| {
                geometry
                    .coordinates
                    .iter()
                    .filter(|point| point.len() >= 2)
                    .map(|point| LonLat::new(point[0], point[1]))
                    .collect()
            })
            .unwrap_or_default();
        if path.len() < 2 {
            skipped += 1;
            continue;
        }
        let properties = feature.properties;
        records.push(TripRecord {
            trip_id: TripId(properties.tripid.into_string()),
            taxi_id: TaxiId(properties.taxiid.into_string()),
            path,
            distance_meters: non_negative_or_zero(properties.distance),
            avg_speed_kph: non_negative_or_zero(properties.avspeed),
            street_names: properties
                .streetnames
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        });
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} features with fewer than 2 path points");
    }
    records
}

fn non_negative_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "LineString",
                              "coordinates": [[-8.61, 41.15], [-8.62, 41.16], [-8.63, 41.17]] },
                "properties": { "tripid": "t-1", "taxiid": "taxi-9",
                                "distance": 1250.5, "avspeed": 32.4,
                                "streetnames": ["Main St", "", "Main St", null] }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[-8.61, 41.15]] },
                "properties": { "tripid": "t-2", "taxiid": "taxi-9" }
            }
        ]
    }"#;

    #[test]
    fn parses_records_and_drops_short_paths() {
        let records = load_trips_str(SAMPLE).unwrap();
        assert_eq!(records.len(), 1, "the 1-point feature is skipped");

        let record = &records[0];
        assert_eq!(record.trip_id.0, "t-1");
        assert_eq!(record.taxi_id.0, "taxi-9");
        assert_eq!(record.path.len(), 3);
        assert_eq!(record.path[0].lon, -8.61);
        assert_eq!(record.path[0].lat, 41.15);
        assert_eq!(record.distance_meters, 1250.5);
        assert_eq!(record.avg_speed_kph, 32.4);
        assert_eq!(record.street_names, vec!["Main St", "", "Main St", ""]);
    }

    #[test]
    fn numeric_identifiers_become_strings() {
        let json = r#"{ "features": [ {
            "geometry": { "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
            "properties": { "tripid": 17, "taxiid": 20000542 }
        } ] }"#;
        let records = load_trips_str(json).unwrap();
        assert_eq!(records[0].trip_id.0, "17");
        assert_eq!(records[0].taxi_id.0, "20000542");
    }

    #[test]
    fn missing_and_negative_metrics_normalize_to_zero() {
        let json = r#"{ "features": [ {
            "geometry": { "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
            "properties": { "tripid": "a", "taxiid": "b",
                            "avspeed": -4.0 }
        } ] }"#;
        let records = load_trips_str(json).unwrap();
        assert_eq!(records[0].distance_meters, 0.0);
        assert_eq!(records[0].avg_speed_kph, 0.0);
        assert!(records[0].street_names.is_empty());
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        assert!(matches!(
            load_trips_str("not json at all"),
            Err(LoadError::Parse(_))
        ));
        // A document without the features array is the wrong shape, not an
        // empty dataset.
        assert!(matches!(
            load_trips_str(r#"{ "type": "FeatureCollection" }"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn empty_feature_list_loads_as_empty_dataset() {
        let records = load_trips_str(r#"{ "features": [] }"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_geometry_counts_as_short_path() {
        let json = r#"{ "features": [ {
            "properties": { "tripid": "a", "taxiid": "b" }
        } ] }"#;
        let records = load_trips_str(json).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn loads_from_a_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_trips_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_trips_file("/definitely/not/here.json"),
            Err(LoadError::Io(_))
        ));
    }
}
