//! Shared builders for tests, to keep fixtures short across test modules.

use crate::trips::{LonLat, TaxiId, TripId, TripRecord, TripSummary};

/// A minimal two-point path so every fixture satisfies the loader invariant.
pub fn two_point_path() -> Vec<LonLat> {
    vec![LonLat::new(-8.61, 41.15), LonLat::new(-8.62, 41.16)]
}

pub fn record(trip_id: &str, taxi_id: &str, distance_meters: f64, avg_speed_kph: f64) -> TripRecord {
    TripRecord {
        trip_id: TripId(trip_id.to_string()),
        taxi_id: TaxiId(taxi_id.to_string()),
        path: two_point_path(),
        distance_meters,
        avg_speed_kph,
        street_names: Vec::new(),
    }
}

pub fn record_with_streets(trip_id: &str, taxi_id: &str, streets: &[&str]) -> TripRecord {
    TripRecord {
        street_names: streets.iter().map(|street| street.to_string()).collect(),
        ..record(trip_id, taxi_id, 100.0, 30.0)
    }
}

pub fn summary(trip_id: &str, taxi_id: &str, distance_meters: f64) -> TripSummary {
    TripSummary {
        trip_id: TripId(trip_id.to_string()),
        taxi_id: TaxiId(taxi_id.to_string()),
        distance_meters,
        avg_speed_kph: 30.0,
    }
}
