//! Pure aggregation over the loaded dataset: per-trip summaries, per-taxi
//! rollups, and street frequency counts. Nothing here mutates the records.

use std::collections::HashMap;

use crate::trips::{StreetFrequency, TaxiAggregate, TaxiId, TripRecord, TripSummary};

/// Number of taxis the distance rollup keeps.
pub const TOP_TAXI_COUNT: usize = 10;

/// Project every record into a [`TripSummary`], preserving dataset order.
pub fn summarize(records: &[TripRecord]) -> Vec<TripSummary> {
    records.iter().map(TripSummary::of).collect()
}

/// The first `n` summaries in dataset order. The trip charts show the
/// leading slice of the dataset, not a sorted top-N; that is the documented
/// policy.
pub fn top_by_distance(summaries: &[TripSummary], n: usize) -> Vec<TripSummary> {
    summaries.iter().take(n).cloned().collect()
}

/// Group summaries by taxi, counting trips and summing distance, then keep
/// the [`TOP_TAXI_COUNT`] taxis with the largest totals.
///
/// Grouping happens in first-encounter order and the sort is stable, so
/// taxis with equal totals stay in the order they first appeared.
pub fn aggregate_by_taxi(summaries: &[TripSummary]) -> Vec<TaxiAggregate> {
    let mut aggregates: Vec<TaxiAggregate> = Vec::new();
    let mut index: HashMap<TaxiId, usize> = HashMap::new();
    for summary in summaries {
        let slot = *index.entry(summary.taxi_id.clone()).or_insert_with(|| {
            aggregates.push(TaxiAggregate {
                taxi_id: summary.taxi_id.clone(),
                trip_count: 0,
                total_distance_meters: 0.0,
            });
            aggregates.len() - 1
        });
        aggregates[slot].trip_count += 1;
        aggregates[slot].total_distance_meters += summary.distance_meters;
    }
    aggregates.sort_by(|a, b| {
        b.total_distance_meters
            .partial_cmp(&a.total_distance_meters)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    aggregates.truncate(TOP_TAXI_COUNT);
    aggregates
}

/// Count how often each non-empty street name occurs across the given
/// per-trip street lists. Output order is first occurrence, not count.
pub fn street_frequencies(street_lists: &[Vec<String>]) -> Vec<StreetFrequency> {
    let mut frequencies: Vec<StreetFrequency> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for list in street_lists {
        for name in list {
            if name.is_empty() {
                continue;
            }
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                frequencies.push(StreetFrequency {
                    street_name: name.clone(),
                    occurrence_count: 0,
                });
                frequencies.len() - 1
            });
            frequencies[slot].occurrence_count += 1;
        }
    }
    frequencies
}
