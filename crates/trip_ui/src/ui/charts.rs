//! Chart panels: distance-by-taxi bars (clickable), speed-by-trip line, and
//! the street breakdown pie of the selected taxi.

use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Pos2, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, Points};

use trip_core::controller::Selection;
use trip_core::trips::{StreetFrequency, TaxiAggregate, TaxiId, TripSummary};

use crate::ui::constants::{CHART_HEIGHT, PIE_PANEL_HEIGHT};
use crate::ui::utils::{
    chart_color_distance, chart_color_speed, chart_color_speed_points, legend_item, slice_color,
};

const BAR_WIDTH: f64 = 0.7;

/// Draw the per-taxi distance bars and report which taxi's bar was clicked,
/// if any.
pub fn render_bar_chart(ui: &mut egui::Ui, aggregates: &[TaxiAggregate]) -> Option<TaxiId> {
    let labels: Vec<String> = aggregates
        .iter()
        .map(|aggregate| aggregate.taxi_id.to_string())
        .collect();
    let bars: Vec<Bar> = aggregates
        .iter()
        .enumerate()
        .map(|(index, aggregate)| {
            Bar::new(index as f64, aggregate.total_distance_meters)
                .width(BAR_WIDTH)
                .fill(chart_color_distance())
                .name(format!(
                    "Taxi ID: {}\nTrips: {}\nDistance: {:.2} m",
                    aggregate.taxi_id, aggregate.trip_count, aggregate.total_distance_meters
                ))
        })
        .collect();
    let heights: Vec<f64> = aggregates
        .iter()
        .map(|aggregate| aggregate.total_distance_meters)
        .collect();

    let mut clicked_index = None;
    Plot::new("distance_by_taxi")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new("Distance by taxi", bars));
            if plot_ui.response().clicked() {
                if let Some(point) = plot_ui.pointer_coordinate() {
                    clicked_index = bar_hit(&heights, point.x, point.y);
                }
            }
        });

    clicked_index.map(|index| aggregates[index].taxi_id.clone())
}

/// Average speed over the leading trips, a line with point markers.
pub fn render_line_chart(ui: &mut egui::Ui, trips: &[TripSummary]) {
    let labels: Vec<String> = trips.iter().map(|trip| trip.trip_id.to_string()).collect();
    let series: Vec<[f64; 2]> = trips
        .iter()
        .enumerate()
        .map(|(index, trip)| [index as f64, trip.avg_speed_kph])
        .collect();

    Plot::new("avg_speed_by_trip")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Average speed (km/h)", series.clone()).color(chart_color_speed()),
            );
            plot_ui.points(
                Points::new("Trips", series)
                    .radius(3.0)
                    .color(chart_color_speed_points()),
            );
        });
}

/// The street breakdown of the selected taxi. Cleared and redrawn from
/// scratch on every selection; empty until the first bar click.
pub fn render_pie_chart(ui: &mut egui::Ui, frequencies: &[StreetFrequency], selection: &Selection) {
    if frequencies.is_empty() {
        match selection.selected() {
            None => ui.label("Click a taxi's bar to see its street breakdown."),
            Some(taxi_id) => ui.label(format!("No street names recorded for taxi {taxi_id}.")),
        };
        return;
    }

    let total: usize = frequencies
        .iter()
        .map(|frequency| frequency.occurrence_count)
        .sum();

    ui.horizontal_top(|ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(PIE_PANEL_HEIGHT), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width() * 0.45;

        let mut angle = -FRAC_PI_2;
        for (index, frequency) in frequencies.iter().enumerate() {
            let sweep = frequency.occurrence_count as f64 / total as f64 * TAU;
            draw_sector(&painter, center, radius, angle, angle + sweep, slice_color(index));
            angle += sweep;
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(60)));

        egui::ScrollArea::vertical()
            .id_salt("street_legend")
            .max_height(PIE_PANEL_HEIGHT)
            .show(ui, |ui| {
                for (index, frequency) in frequencies.iter().enumerate() {
                    let share = frequency.occurrence_count as f64 / total as f64 * 100.0;
                    legend_item(
                        ui,
                        slice_color(index),
                        &format!(
                            "{} ({} times, {share:.0}%)",
                            frequency.street_name, frequency.occurrence_count
                        ),
                    );
                }
            });
    });
}

/// Label integer marks with the element's id, everything else stays blank.
fn axis_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 0.05 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Which bar covers plot coordinate (x, y), if any.
fn bar_hit(heights: &[f64], x: f64, y: f64) -> Option<usize> {
    let index = x.round();
    if index < 0.0 || (x - index).abs() > BAR_WIDTH / 2.0 {
        return None;
    }
    let index = index as usize;
    let height = *heights.get(index)?;
    (y >= 0.0 && y <= height).then_some(index)
}

fn draw_sector(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    start: f64,
    end: f64,
    color: Color32,
) {
    // Triangle fan: sectors wider than a half turn are not convex, so the
    // slice is built from small convex pieces.
    let steps = (((end - start) / TAU * 64.0).ceil() as usize).max(2);
    let mut previous = point_on_circle(center, radius, start);
    for step in 1..=steps {
        let angle = start + (end - start) * step as f64 / steps as f64;
        let next = point_on_circle(center, radius, angle);
        painter.add(Shape::convex_polygon(
            vec![center, previous, next],
            color,
            Stroke::NONE,
        ));
        previous = next;
    }
}

fn point_on_circle(center: Pos2, radius: f32, angle: f64) -> Pos2 {
    center + Vec2::new(angle.cos() as f32, angle.sin() as f32) * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_hit_requires_the_bar_column_and_height() {
        let heights = [100.0, 50.0];
        assert_eq!(bar_hit(&heights, 0.0, 50.0), Some(0));
        assert_eq!(bar_hit(&heights, 1.1, 20.0), Some(1));
        // Between bars.
        assert_eq!(bar_hit(&heights, 0.5, 10.0), None);
        // Above the bar top.
        assert_eq!(bar_hit(&heights, 1.0, 80.0), None);
        // Outside the chart.
        assert_eq!(bar_hit(&heights, -1.0, 10.0), None);
        assert_eq!(bar_hit(&heights, 5.0, 10.0), None);
    }

    #[test]
    fn axis_labels_only_on_integer_marks() {
        let labels = vec!["taxi-1".to_string(), "taxi-2".to_string()];
        assert_eq!(axis_label(&labels, 0.0), "taxi-1");
        assert_eq!(axis_label(&labels, 1.02), "taxi-2");
        assert_eq!(axis_label(&labels, 0.5), "");
        assert_eq!(axis_label(&labels, 7.0), "");
    }
}
