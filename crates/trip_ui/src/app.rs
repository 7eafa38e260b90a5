//! Application state: dataset lifecycle, derived chart collections, the map
//! scene, and the current selection.

use std::sync::mpsc::{Receiver, TryRecvError};

use trip_core::aggregate::{aggregate_by_taxi, summarize, top_by_distance, TOP_TAXI_COUNT};
use trip_core::controller::{Selection, TripLayerGroup};
use trip_core::dataset::{self, LoadError};
use trip_core::demo::demo_trips;
use trip_core::scene::{MapScene, MapView, MarkerStyle, PathStyle};
use trip_core::trips::{StreetFrequency, TaxiAggregate, TaxiId, TripRecord, TripSummary};

use crate::ui::constants::DEFAULT_TILE_ATTRIBUTION;
use crate::ui::utils::trip_tooltip;

mod tiles;

pub use tiles::{choose_tile_zoom, tiles_for_bounds, GeoBounds, TileCache, TileGeometry, TileKey};

/// How many trips the speed line chart shows (the leading dataset slice).
pub const CHART_TRIP_COUNT: usize = 10;

const DEMO_SEED: u64 = 42;
const DEMO_TAXI_COUNT: usize = 8;

pub struct TripUiApp {
    /// Path or URL the next load will read.
    pub dataset_source: String,
    /// `{z}`/`{x}`/`{y}` template of the vector tile endpoint; empty disables
    /// the base layer.
    pub tile_endpoint: String,
    pub loading: bool,
    pub load_error: Option<String>,
    load_result: Option<Receiver<Result<Vec<TripRecord>, LoadError>>>,

    pub records: Vec<TripRecord>,
    pub summaries: Vec<TripSummary>,
    /// Leading slice feeding the speed line chart.
    pub chart_trips: Vec<TripSummary>,
    /// Top taxis by total distance, feeding the bar chart.
    pub taxi_aggregates: Vec<TaxiAggregate>,

    pub scene: MapScene,
    pub layer_groups: TripLayerGroup,
    pub selection: Selection,
    /// Street breakdown of the selected taxi, redrawn on every selection.
    pub pie: Vec<StreetFrequency>,

    pub tiles: TileCache,
}

impl TripUiApp {
    pub fn new() -> Self {
        Self {
            dataset_source: "trips.json".to_string(),
            tile_endpoint: String::new(),
            loading: false,
            load_error: None,
            load_result: None,
            records: Vec::new(),
            summaries: Vec::new(),
            chart_trips: Vec::new(),
            taxi_aggregates: Vec::new(),
            scene: MapScene::new(MapView::default()),
            layer_groups: TripLayerGroup::build(&[], &[]),
            selection: Selection::Unselected,
            pie: Vec::new(),
            tiles: TileCache::new(),
        }
    }

    /// Kick off a dataset load on a worker thread. The UI keeps rendering;
    /// [`poll_load`](Self::poll_load) picks up the result.
    pub fn start_load(&mut self) {
        if self.loading {
            return;
        }
        let source = self.dataset_source.trim().to_string();
        if source.is_empty() {
            return;
        }
        let (sender, receiver) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = sender.send(fetch_records(&source));
        });
        self.loading = true;
        self.load_error = None;
        self.load_result = Some(receiver);
    }

    /// Drain the load channel. Called once per frame.
    pub fn poll_load(&mut self) {
        let Some(receiver) = self.load_result.take() else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(records)) => {
                self.loading = false;
                self.install_records(records);
            }
            Ok(Err(error)) => {
                log::error!("dataset load failed: {error}");
                self.loading = false;
                self.load_error = Some(error.to_string());
            }
            Err(TryRecvError::Empty) => {
                // Still in flight, keep waiting.
                self.load_result = Some(receiver);
            }
            Err(TryRecvError::Disconnected) => {
                log::error!("dataset load worker vanished without a result");
                self.loading = false;
                self.load_error = Some("load worker terminated unexpectedly".to_string());
            }
        }
    }

    /// Replace the dataset with the generated demo trips.
    pub fn load_demo(&mut self) {
        let records = demo_trips(DEMO_TAXI_COUNT, DEMO_SEED);
        self.load_error = None;
        self.install_records(records);
    }

    /// Build every derived collection and the map scene from a freshly
    /// loaded dataset. Selection state resets: nothing is highlighted until
    /// the next bar click.
    fn install_records(&mut self, records: Vec<TripRecord>) {
        log::info!("loaded {} trips", records.len());
        self.summaries = summarize(&records);
        self.chart_trips = top_by_distance(&self.summaries, CHART_TRIP_COUNT);
        self.taxi_aggregates = aggregate_by_taxi(&self.summaries);
        debug_assert!(self.taxi_aggregates.len() <= TOP_TAXI_COUNT);

        let mut scene = MapScene::new(MapView::default());
        let mut handles = Vec::with_capacity(records.len());
        for record in &records {
            let handle = scene.add_path(record.path.clone(), PathStyle::default_route());
            scene.bind_path_tooltip(handle, trip_tooltip(record));
            handles.push(handle);
            if let Some(start) = record.start() {
                let marker = scene.add_marker(start, MarkerStyle::trip_start());
                scene.bind_marker_tooltip(marker, "Start");
            }
            if let Some(end) = record.end() {
                let marker = scene.add_marker(end, MarkerStyle::trip_end());
                scene.bind_marker_tooltip(marker, "End");
            }
        }
        self.layer_groups = TripLayerGroup::build(&records, &handles);
        self.records = records;
        self.scene = scene;
        self.selection = Selection::Unselected;
        self.pie.clear();
        self.apply_tile_endpoint();
    }

    /// A click on taxi `taxi_id`'s bar: restyle the map and recompute the
    /// street breakdown. Bar and line charts are untouched.
    pub fn select_taxi(&mut self, taxi_id: TaxiId) {
        log::info!("selected taxi {taxi_id}");
        self.pie = self
            .selection
            .select(taxi_id, &mut self.scene, &self.layer_groups);
    }

    /// Push the current endpoint string into the scene's tile layer config.
    pub fn apply_tile_endpoint(&mut self) {
        let endpoint = self.tile_endpoint.trim();
        if endpoint.is_empty() {
            self.scene.tile_layer = None;
        } else {
            self.scene
                .set_tile_layer(endpoint, DEFAULT_TILE_ATTRIBUTION);
        }
    }

    pub fn has_dataset(&self) -> bool {
        !self.records.is_empty()
    }
}

fn fetch_records(source: &str) -> Result<Vec<TripRecord>, LoadError> {
    #[cfg(feature = "http")]
    if source.starts_with("http://") || source.starts_with("https://") {
        return dataset::load_trips_url(source);
    }
    dataset::load_trips_file(source)
}
