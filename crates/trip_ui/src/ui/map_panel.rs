//! The map panel: base tile linework, trip paths, start/end markers, and
//! hover tooltips, all painted from the retained scene every frame.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use trip_core::scene::{MapScene, TileLayerConfig};
use trip_core::trips::LonLat;

use crate::app::{choose_tile_zoom, tiles_for_bounds, GeoBounds, TripUiApp};
use crate::ui::constants::{HOVER_RADIUS_PX, MAP_PANEL_HEIGHT};
use crate::ui::utils::color32;

pub fn render_map_panel(ui: &mut egui::Ui, app: &mut TripUiApp) {
    app.tiles.drain_results();

    let size = Vec2::new(ui.available_width(), MAP_PANEL_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, Color32::from_gray(20));
    painter.rect_stroke(
        rect,
        0.0,
        Stroke::new(1.0, Color32::from_gray(60)),
        egui::StrokeKind::Middle,
    );

    let bounds = scene_bounds(&app.scene);
    if let Some(layer) = app.scene.tile_layer.clone() {
        draw_tile_layer(&painter, app, &layer, &bounds, rect);
    }

    // Projected path points are kept around for the hover hit test.
    let mut projected: Vec<Vec<Pos2>> = Vec::with_capacity(app.scene.paths().len());
    for path in app.scene.paths() {
        let points: Vec<Pos2> = path
            .points
            .iter()
            .map(|point| project(*point, &bounds, rect))
            .collect();
        if points.len() >= 2 {
            painter.add(Shape::line(
                points.clone(),
                Stroke::new(path.style.width, color32(path.style.color)),
            ));
        }
        projected.push(points);
    }

    for marker in app.scene.markers() {
        let pos = project(marker.point, &bounds, rect);
        painter.circle_filled(pos, marker.style.radius, color32(marker.style.color));
    }

    if let Some(layer) = &app.scene.tile_layer {
        painter.text(
            rect.right_bottom() - Vec2::new(6.0, 4.0),
            Align2::RIGHT_BOTTOM,
            &layer.attribution,
            FontId::proportional(10.0),
            Color32::from_gray(140),
        );
    }

    if let Some(pointer) = response.hover_pos() {
        if let Some(text) = tooltip_under(&app.scene, &projected, &bounds, rect, pointer) {
            draw_tooltip(&painter, rect, pointer, &text);
        }
    }
}

/// Data bounds with a 10% margin, or a default window around the view
/// center while nothing is loaded.
fn scene_bounds(scene: &MapScene) -> GeoBounds {
    let mut lat_min = f64::INFINITY;
    let mut lat_max = f64::NEG_INFINITY;
    let mut lon_min = f64::INFINITY;
    let mut lon_max = f64::NEG_INFINITY;
    for path in scene.paths() {
        for point in &path.points {
            lat_min = lat_min.min(point.lat);
            lat_max = lat_max.max(point.lat);
            lon_min = lon_min.min(point.lon);
            lon_max = lon_max.max(point.lon);
        }
    }
    if lat_min > lat_max {
        let center = scene.view.center;
        return GeoBounds {
            lat_min: center.lat - 0.04,
            lat_max: center.lat + 0.04,
            lon_min: center.lon - 0.06,
            lon_max: center.lon + 0.06,
        };
    }
    let lat_margin = ((lat_max - lat_min) * 0.1).max(0.002);
    let lon_margin = ((lon_max - lon_min) * 0.1).max(0.002);
    GeoBounds {
        lat_min: lat_min - lat_margin,
        lat_max: lat_max + lat_margin,
        lon_min: lon_min - lon_margin,
        lon_max: lon_max + lon_margin,
    }
}

fn project(point: LonLat, bounds: &GeoBounds, rect: Rect) -> Pos2 {
    let x = (point.lon - bounds.lon_min) / (bounds.lon_max - bounds.lon_min);
    let y = (bounds.lat_max - point.lat) / (bounds.lat_max - bounds.lat_min);
    egui::pos2(
        rect.left() + rect.width() * x as f32,
        rect.top() + rect.height() * y as f32,
    )
}

fn draw_tile_layer(
    painter: &egui::Painter,
    app: &mut TripUiApp,
    layer: &TileLayerConfig,
    bounds: &GeoBounds,
    rect: Rect,
) {
    if !bounds.is_valid() {
        return;
    }
    let zoom = choose_tile_zoom(bounds);
    let keys = tiles_for_bounds(bounds, zoom);
    app.tiles.request_missing(&layer.url_template, keys.iter().copied());

    let stroke = Stroke::new(1.0, Color32::from_gray(80));
    for key in &keys {
        let Some(geometry) = app.tiles.tile(key) else {
            continue;
        };
        for line in &geometry.lines {
            let points: Vec<Pos2> = line
                .iter()
                .map(|point| project(*point, bounds, rect))
                .collect();
            if points.len() >= 2 {
                painter.add(Shape::line(points, stroke));
            }
        }
    }
}

fn tooltip_under(
    scene: &MapScene,
    projected: &[Vec<Pos2>],
    bounds: &GeoBounds,
    rect: Rect,
    pointer: Pos2,
) -> Option<String> {
    // Markers win over paths; they are smaller targets.
    for marker in scene.markers() {
        let pos = project(marker.point, bounds, rect);
        if pos.distance(pointer) <= marker.style.radius + 2.0 {
            if let Some(text) = &marker.tooltip {
                return Some(text.clone());
            }
        }
    }

    let mut best: Option<(f32, &str)> = None;
    for (path, points) in scene.paths().iter().zip(projected) {
        let Some(text) = &path.tooltip else {
            continue;
        };
        for pair in points.windows(2) {
            let distance = distance_to_segment(pointer, pair[0], pair[1]);
            if distance <= HOVER_RADIUS_PX && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, text.as_str()));
            }
        }
    }
    best.map(|(_, text)| text.to_string())
}

fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

fn draw_tooltip(painter: &egui::Painter, rect: Rect, pointer: Pos2, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(12.0),
        Color32::WHITE,
    );
    let mut pos = pointer + Vec2::new(14.0, 14.0);
    if pos.x + galley.size().x + 10.0 > rect.right() {
        pos.x = pointer.x - galley.size().x - 14.0;
    }
    if pos.y + galley.size().y + 10.0 > rect.bottom() {
        pos.y = pointer.y - galley.size().y - 14.0;
    }
    let background = Rect::from_min_size(pos, galley.size()).expand(5.0);
    painter.rect_filled(background, 4.0, Color32::from_rgba_unmultiplied(10, 10, 10, 230));
    painter.rect_stroke(
        background,
        4.0,
        Stroke::new(1.0, Color32::from_gray(90)),
        egui::StrokeKind::Middle,
    );
    painter.galley(pos, galley, Color32::WHITE);
}
