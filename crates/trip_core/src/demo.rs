//! Synthetic demo dataset: lets the viewer run without the exported
//! `trips.json`. Deterministic under a fixed seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::trips::{LonLat, TaxiId, TripId, TripRecord};

// Roughly the area the Porto taxi dataset covers.
const CENTER: LonLat = LonLat {
    lon: -8.61,
    lat: 41.15,
};

const STREET_POOL: &[&str] = &[
    "Avenida dos Aliados",
    "Rua de Santa Catarina",
    "Rua das Flores",
    "Avenida da Boavista",
    "Rua do Almada",
    "Rua de Cedofeita",
    "Rua Miguel Bombarda",
    "Rua de São Bento",
    "Avenida de França",
    "Rua do Bonjardim",
];

/// Generate `taxi_count` taxis with 1–5 trips each around the default map
/// center. The same seed always yields the same dataset.
pub fn demo_trips(taxi_count: usize, seed: u64) -> Vec<TripRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();
    for taxi_index in 0..taxi_count {
        let taxi_id = TaxiId(format!("taxi-{}", taxi_index + 1));
        let trip_count = rng.gen_range(1..=5);
        for trip_index in 0..trip_count {
            let path = random_path(&mut rng);
            let distance_meters = path_length_meters(&path);
            records.push(TripRecord {
                trip_id: TripId(format!("trip-{}-{}", taxi_index + 1, trip_index + 1)),
                taxi_id: taxi_id.clone(),
                path,
                distance_meters,
                avg_speed_kph: rng.gen_range(12.0..55.0),
                street_names: random_streets(&mut rng),
            });
        }
    }
    records
}

fn random_path<R: Rng>(rng: &mut R) -> Vec<LonLat> {
    let mut lon = CENTER.lon + rng.gen_range(-0.03..0.03);
    let mut lat = CENTER.lat + rng.gen_range(-0.02..0.02);
    let point_count = rng.gen_range(4..=10);
    let mut path = Vec::with_capacity(point_count);
    path.push(LonLat::new(lon, lat));
    for _ in 1..point_count {
        lon += rng.gen_range(-0.004..0.004);
        lat += rng.gen_range(-0.003..0.003);
        path.push(LonLat::new(lon, lat));
    }
    path
}

fn random_streets<R: Rng>(rng: &mut R) -> Vec<String> {
    let count = rng.gen_range(2..=5);
    let mut streets = Vec::with_capacity(count);
    for _ in 0..count {
        // Occasional empty entry, matching what real exports contain.
        if rng.gen_bool(0.1) {
            streets.push(String::new());
        } else {
            streets.push(STREET_POOL[rng.gen_range(0..STREET_POOL.len())].to_string());
        }
    }
    streets
}

/// Equirectangular path length, good enough at city scale.
fn path_length_meters(path: &[LonLat]) -> f64 {
    const METERS_PER_DEG_LAT: f64 = 111_320.0;
    let mut total = 0.0;
    for pair in path.windows(2) {
        let mid_lat = ((pair[0].lat + pair[1].lat) * 0.5).to_radians();
        let dx = (pair[1].lon - pair[0].lon) * METERS_PER_DEG_LAT * mid_lat.cos();
        let dy = (pair[1].lat - pair[0].lat) * METERS_PER_DEG_LAT;
        total += (dx * dx + dy * dy).sqrt();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_is_deterministic() {
        let a = demo_trips(5, 42);
        let b = demo_trips(5, 42);
        assert_eq!(a.len(), b.len());
        for (left, right) in a.iter().zip(&b) {
            assert_eq!(left.trip_id, right.trip_id);
            assert_eq!(left.distance_meters, right.distance_meters);
            assert_eq!(left.street_names, right.street_names);
        }
    }

    #[test]
    fn generated_records_are_valid() {
        let records = demo_trips(8, 7);
        assert!(!records.is_empty());
        for record in &records {
            assert!(record.path.len() >= 2);
            assert!(record.distance_meters >= 0.0);
            assert!(record.avg_speed_kph >= 0.0);
        }
    }

    #[test]
    fn every_taxi_gets_at_least_one_trip() {
        let records = demo_trips(6, 1);
        let taxis: std::collections::HashSet<_> =
            records.iter().map(|record| record.taxi_id.clone()).collect();
        assert_eq!(taxis.len(), 6);
    }

    #[test]
    fn path_length_sums_segments() {
        let path = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(0.0, 0.001),
            LonLat::new(0.0, 0.002),
        ];
        let length = path_length_meters(&path);
        assert!((length - 2.0 * 111.32).abs() < 0.5);
    }
}
