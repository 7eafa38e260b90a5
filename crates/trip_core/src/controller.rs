//! Selection state machine: wires a bar-chart click to map restyling and to
//! the street breakdown of the clicked taxi.

use std::collections::HashMap;

use crate::aggregate::street_frequencies;
use crate::scene::{MapScene, PathHandle, PathStyle};
use crate::trips::{StreetFrequency, TaxiId, TripRecord};

/// Which taxi, if any, is currently highlighted. Starts unselected; a bar
/// click always moves to `Selected`, there is no way back to `Unselected`.
/// Re-selecting the same taxi redraws identically, so clicks are idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(TaxiId),
}

impl Selection {
    pub fn selected(&self) -> Option<&TaxiId> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(taxi_id) => Some(taxi_id),
        }
    }

    /// Enter `Selected(taxi_id)`: reset every grouped path to the default
    /// style, highlight the taxi's paths, and return its street breakdown
    /// for the pie chart redraw. No other chart's data is touched.
    pub fn select(
        &mut self,
        taxi_id: TaxiId,
        scene: &mut MapScene,
        groups: &TripLayerGroup,
    ) -> Vec<StreetFrequency> {
        for handle in groups.all_handles() {
            scene.set_style(handle, PathStyle::default_route());
        }
        for &handle in groups.handles_of(&taxi_id).unwrap_or(&[]) {
            scene.set_style(handle, PathStyle::highlighted());
        }
        let frequencies = street_frequencies(groups.street_lists_of(&taxi_id).unwrap_or(&[]));
        *self = Selection::Selected(taxi_id);
        frequencies
    }
}

struct TaxiLayers {
    taxi_id: TaxiId,
    handles: Vec<PathHandle>,
    street_lists: Vec<Vec<String>>,
}

/// Per-taxi grouping of the scene's path handles and street name lists.
/// Built once after the scene is populated and structurally immutable
/// afterwards; selection only restyles the paths it points at.
pub struct TripLayerGroup {
    groups: Vec<TaxiLayers>,
    index: HashMap<TaxiId, usize>,
}

impl TripLayerGroup {
    /// Pair each record with the handle of the path it was drawn as.
    /// `handles[i]` must be the scene path of `records[i]`.
    pub fn build(records: &[TripRecord], handles: &[PathHandle]) -> Self {
        debug_assert_eq!(
            records.len(),
            handles.len(),
            "one path handle per record"
        );
        let mut groups: Vec<TaxiLayers> = Vec::new();
        let mut index: HashMap<TaxiId, usize> = HashMap::new();
        for (record, &handle) in records.iter().zip(handles) {
            let slot = *index.entry(record.taxi_id.clone()).or_insert_with(|| {
                groups.push(TaxiLayers {
                    taxi_id: record.taxi_id.clone(),
                    handles: Vec::new(),
                    street_lists: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].handles.push(handle);
            groups[slot].street_lists.push(record.street_names.clone());
        }
        Self { groups, index }
    }

    pub fn handles_of(&self, taxi_id: &TaxiId) -> Option<&[PathHandle]> {
        self.index
            .get(taxi_id)
            .map(|&slot| self.groups[slot].handles.as_slice())
    }

    pub fn street_lists_of(&self, taxi_id: &TaxiId) -> Option<&[Vec<String>]> {
        self.index
            .get(taxi_id)
            .map(|&slot| self.groups[slot].street_lists.as_slice())
    }

    pub fn all_handles(&self) -> impl Iterator<Item = PathHandle> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.handles.iter().copied())
    }

    pub fn taxi_ids(&self) -> impl Iterator<Item = &TaxiId> {
        self.groups.iter().map(|group| &group.taxi_id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MapView, PathStyle};
    use crate::test_helpers::record_with_streets;

    fn scene_and_groups(records: &[TripRecord]) -> (MapScene, TripLayerGroup) {
        let mut scene = MapScene::new(MapView::default());
        let handles: Vec<_> = records
            .iter()
            .map(|record| scene.add_path(record.path.clone(), PathStyle::default_route()))
            .collect();
        let groups = TripLayerGroup::build(records, &handles);
        (scene, groups)
    }

    fn sample_records() -> Vec<TripRecord> {
        vec![
            record_with_streets("t1", "A", &["Main St", "Side Ave"]),
            record_with_streets("t2", "B", &["Main St"]),
            record_with_streets("t3", "A", &["Main St", ""]),
        ]
    }

    fn styles(scene: &MapScene) -> Vec<PathStyle> {
        scene.paths().iter().map(|path| path.style).collect()
    }

    #[test]
    fn selecting_highlights_only_that_taxi() {
        let records = sample_records();
        let (mut scene, groups) = scene_and_groups(&records);
        let mut selection = Selection::default();
        assert_eq!(selection.selected(), None);

        selection.select(TaxiId("A".into()), &mut scene, &groups);
        assert_eq!(
            styles(&scene),
            vec![
                PathStyle::highlighted(),
                PathStyle::default_route(),
                PathStyle::highlighted(),
            ]
        );
        assert_eq!(selection.selected(), Some(&TaxiId("A".into())));
    }

    #[test]
    fn switching_selection_moves_the_highlight() {
        let records = sample_records();
        let (mut scene, groups) = scene_and_groups(&records);
        let mut selection = Selection::default();

        selection.select(TaxiId("A".into()), &mut scene, &groups);
        selection.select(TaxiId("B".into()), &mut scene, &groups);
        assert_eq!(
            styles(&scene),
            vec![
                PathStyle::default_route(),
                PathStyle::highlighted(),
                PathStyle::default_route(),
            ]
        );
    }

    #[test]
    fn reselecting_the_same_taxi_is_idempotent() {
        let records = sample_records();
        let (mut scene, groups) = scene_and_groups(&records);
        let mut selection = Selection::default();

        let first = selection.select(TaxiId("A".into()), &mut scene, &groups);
        let styles_after_first = styles(&scene);
        let second = selection.select(TaxiId("A".into()), &mut scene, &groups);
        assert_eq!(first, second);
        assert_eq!(styles(&scene), styles_after_first);
        assert_eq!(selection, Selection::Selected(TaxiId("A".into())));
    }

    #[test]
    fn selection_returns_the_taxis_street_breakdown() {
        let records = sample_records();
        let (mut scene, groups) = scene_and_groups(&records);
        let mut selection = Selection::default();

        let frequencies = selection.select(TaxiId("A".into()), &mut scene, &groups);
        assert_eq!(frequencies.len(), 2);
        assert_eq!(frequencies[0].street_name, "Main St");
        assert_eq!(frequencies[0].occurrence_count, 2);
        assert_eq!(frequencies[1].street_name, "Side Ave");
        assert_eq!(frequencies[1].occurrence_count, 1);

        // Same answer as calling the aggregator on the group directly.
        let direct = street_frequencies(groups.street_lists_of(&TaxiId("A".into())).unwrap());
        assert_eq!(frequencies, direct);
    }

    #[test]
    fn unknown_taxi_clears_highlights_and_yields_nothing() {
        let records = sample_records();
        let (mut scene, groups) = scene_and_groups(&records);
        let mut selection = Selection::default();

        selection.select(TaxiId("A".into()), &mut scene, &groups);
        let frequencies = selection.select(TaxiId("ghost".into()), &mut scene, &groups);
        assert!(frequencies.is_empty());
        assert!(styles(&scene)
            .iter()
            .all(|style| *style == PathStyle::default_route()));
    }

    #[test]
    fn layer_group_preserves_first_encounter_order() {
        let records = sample_records();
        let (_, groups) = scene_and_groups(&records);
        let order: Vec<_> = groups.taxi_ids().map(|taxi| taxi.0.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
        assert_eq!(groups.handles_of(&TaxiId("A".into())).unwrap().len(), 2);
    }

    #[test]
    fn empty_dataset_builds_an_empty_group() {
        let (mut scene, groups) = scene_and_groups(&[]);
        assert!(groups.is_empty());

        let mut selection = Selection::default();
        let frequencies = selection.select(TaxiId("A".into()), &mut scene, &groups);
        assert!(frequencies.is_empty());
    }
}
