//! Formatting and color helpers for the UI.

use eframe::egui::{self, Color32, Vec2};
use trip_core::scene::Rgb;
use trip_core::trips::TripRecord;

pub fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// Tooltip shown when hovering a trip path.
pub fn trip_tooltip(record: &TripRecord) -> String {
    format!(
        "Trip ID: {}\nTaxi ID: {}\nDistance: {:.2} m\nAvg Speed: {:.2} km/h",
        record.trip_id, record.taxi_id, record.distance_meters, record.avg_speed_kph
    )
}

/// Categorical palette for pie slices, cycled when a taxi crosses more than
/// ten distinct streets.
const SLICE_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
    Color32::from_rgb(0xbc, 0xbd, 0x22),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

pub fn slice_color(index: usize) -> Color32 {
    SLICE_PALETTE[index % SLICE_PALETTE.len()]
}

pub fn chart_color_distance() -> Color32 {
    Color32::from_rgb(70, 130, 180)
}

pub fn chart_color_speed() -> Color32 {
    Color32::from_rgb(255, 165, 0)
}

pub fn chart_color_speed_points() -> Color32 {
    Color32::from_rgb(218, 54, 51)
}

/// Render a legend item (color swatch + label).
pub fn legend_item(ui: &mut egui::Ui, color: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::new(14.0, 14.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, color);
        ui.label(label);
    });
}
