//! Retained map scene: the narrow surface the GUI paints every frame.
//!
//! The scene is append-only: paths and markers are added once after the
//! dataset loads, and afterwards only path styles change (selection
//! highlighting). Handles returned by the `add_*` methods stay valid for the
//! lifetime of the scene.

use crate::trips::LonLat;

/// 8-bit RGB color; the GUI layer converts it to its own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Stroke style of a trip path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: Rgb,
    pub width: f32,
}

impl PathStyle {
    /// The unselected route style.
    pub fn default_route() -> Self {
        Self {
            color: Rgb::new(70, 130, 180),
            width: 2.0,
        }
    }

    /// The style of the selected taxi's routes.
    pub fn highlighted() -> Self {
        Self {
            color: Rgb::new(255, 69, 0),
            width: 3.5,
        }
    }
}

/// Fill style of a start/end marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub color: Rgb,
    pub radius: f32,
}

impl MarkerStyle {
    /// Green dot at the first path point.
    pub fn trip_start() -> Self {
        Self {
            color: Rgb::new(46, 160, 67),
            radius: 5.0,
        }
    }

    /// Red dot at the last path point.
    pub fn trip_end() -> Self {
        Self {
            color: Rgb::new(218, 54, 51),
            radius: 5.0,
        }
    }
}

/// Initial viewport of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LonLat,
    pub zoom: u8,
}

impl MapView {
    pub fn new(center: LonLat, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

impl Default for MapView {
    fn default() -> Self {
        // Porto, where the source dataset was recorded.
        Self::new(LonLat::new(-8.61, 41.15), 13)
    }
}

/// Base tile layer: a URL template with `{z}`/`{x}`/`{y}` placeholders plus
/// the attribution line the map panel must display.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerConfig {
    pub url_template: String,
    pub attribution: String,
}

/// Opaque handle to a path in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathHandle(usize);

/// Opaque handle to a marker in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(usize);

#[derive(Debug, Clone)]
pub struct ScenePath {
    pub points: Vec<LonLat>,
    pub style: PathStyle,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SceneMarker {
    pub point: LonLat,
    pub style: MarkerStyle,
    pub tooltip: Option<String>,
}

/// Everything the map panel draws, in one place.
#[derive(Debug, Clone)]
pub struct MapScene {
    pub view: MapView,
    pub tile_layer: Option<TileLayerConfig>,
    paths: Vec<ScenePath>,
    markers: Vec<SceneMarker>,
}

impl MapScene {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            tile_layer: None,
            paths: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn set_tile_layer(&mut self, url_template: impl Into<String>, attribution: impl Into<String>) {
        self.tile_layer = Some(TileLayerConfig {
            url_template: url_template.into(),
            attribution: attribution.into(),
        });
    }

    pub fn add_path(&mut self, points: Vec<LonLat>, style: PathStyle) -> PathHandle {
        self.paths.push(ScenePath {
            points,
            style,
            tooltip: None,
        });
        PathHandle(self.paths.len() - 1)
    }

    pub fn add_marker(&mut self, point: LonLat, style: MarkerStyle) -> MarkerHandle {
        self.markers.push(SceneMarker {
            point,
            style,
            tooltip: None,
        });
        MarkerHandle(self.markers.len() - 1)
    }

    pub fn bind_path_tooltip(&mut self, handle: PathHandle, text: impl Into<String>) {
        if let Some(path) = self.paths.get_mut(handle.0) {
            path.tooltip = Some(text.into());
        }
    }

    pub fn bind_marker_tooltip(&mut self, handle: MarkerHandle, text: impl Into<String>) {
        if let Some(marker) = self.markers.get_mut(handle.0) {
            marker.tooltip = Some(text.into());
        }
    }

    /// Restyle one path. Handles always come from `add_path` on the same
    /// scene, so a miss is a programming error.
    pub fn set_style(&mut self, handle: PathHandle, style: PathStyle) {
        debug_assert!(handle.0 < self.paths.len(), "stale path handle");
        if let Some(path) = self.paths.get_mut(handle.0) {
            path.style = style;
        }
    }

    pub fn path_style(&self, handle: PathHandle) -> Option<PathStyle> {
        self.paths.get(handle.0).map(|path| path.style)
    }

    pub fn paths(&self) -> &[ScenePath] {
        &self.paths
    }

    pub fn markers(&self) -> &[SceneMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_index_the_scene_stably() {
        let mut scene = MapScene::new(MapView::default());
        let a = scene.add_path(vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)], PathStyle::default_route());
        let b = scene.add_path(vec![LonLat::new(2.0, 2.0), LonLat::new(3.0, 3.0)], PathStyle::default_route());
        assert_ne!(a, b);

        scene.set_style(b, PathStyle::highlighted());
        assert_eq!(scene.path_style(a), Some(PathStyle::default_route()));
        assert_eq!(scene.path_style(b), Some(PathStyle::highlighted()));
        assert_eq!(scene.paths().len(), 2);
    }

    #[test]
    fn tooltips_attach_to_the_addressed_element() {
        let mut scene = MapScene::new(MapView::default());
        let path = scene.add_path(vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0)], PathStyle::default_route());
        let marker = scene.add_marker(LonLat::new(0.0, 0.0), MarkerStyle::trip_start());

        scene.bind_path_tooltip(path, "a trip");
        scene.bind_marker_tooltip(marker, "Start");

        assert_eq!(scene.paths()[0].tooltip.as_deref(), Some("a trip"));
        assert_eq!(scene.markers()[0].tooltip.as_deref(), Some("Start"));
    }

    #[test]
    fn tile_layer_is_optional_configuration() {
        let mut scene = MapScene::new(MapView::default());
        assert!(scene.tile_layer.is_none());
        scene.set_tile_layer("https://tiles.example/{z}/{x}/{y}.mvt", "© OpenStreetMap contributors");
        let layer = scene.tile_layer.as_ref().unwrap();
        assert!(layer.url_template.contains("{z}"));
        assert!(layer.attribution.contains("OpenStreetMap"));
    }
}
