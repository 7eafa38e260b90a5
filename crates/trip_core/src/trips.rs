//! Trip dataset model: records parsed from the feature collection and the
//! read-only projections derived from them.

use std::fmt;

/// Identifier of a single trip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId(pub String);

/// Identifier of a taxi. Several trips usually share one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxiId(pub String);

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for TaxiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A raw WGS84 coordinate, longitude first (the order the dataset uses).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// One taxi journey as loaded from the dataset. Immutable after loading;
/// the path always has at least two points (shorter features are dropped
/// by the loader).
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub trip_id: TripId,
    pub taxi_id: TaxiId,
    pub path: Vec<LonLat>,
    pub distance_meters: f64,
    pub avg_speed_kph: f64,
    /// Street names traversed, in order. Entries may be empty strings;
    /// frequency counting drops them.
    pub street_names: Vec<String>,
}

impl TripRecord {
    pub fn start(&self) -> Option<LonLat> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<LonLat> {
        self.path.last().copied()
    }
}

/// Chart-facing projection of a [`TripRecord`], one per valid record.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub trip_id: TripId,
    pub taxi_id: TaxiId,
    pub distance_meters: f64,
    pub avg_speed_kph: f64,
}

impl TripSummary {
    pub fn of(record: &TripRecord) -> Self {
        Self {
            trip_id: record.trip_id.clone(),
            taxi_id: record.taxi_id.clone(),
            distance_meters: record.distance_meters,
            avg_speed_kph: record.avg_speed_kph,
        }
    }
}

/// Per-taxi rollup of trip count and total distance.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiAggregate {
    pub taxi_id: TaxiId,
    pub trip_count: usize,
    pub total_distance_meters: f64,
}

/// How often one street name occurs across a taxi's trips.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetFrequency {
    pub street_name: String,
    pub occurrence_count: usize,
}
