//! Panel layout: map on top, the three charts below it.

use eframe::egui;

use crate::app::TripUiApp;
use crate::ui::charts::{render_bar_chart, render_line_chart, render_pie_chart};
use crate::ui::map_panel::render_map_panel;

pub fn render_dashboard(ui: &mut egui::Ui, app: &mut TripUiApp) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::CollapsingHeader::new("Map")
            .default_open(true)
            .show(ui, |ui| {
                ui.group(|ui| render_map_panel(ui, app));
            });

        egui::CollapsingHeader::new("Distance by taxi")
            .default_open(true)
            .show(ui, |ui| {
                ui.group(|ui| {
                    ui.label("Click a bar to highlight that taxi's routes.");
                    if let Some(taxi_id) = render_bar_chart(ui, &app.taxi_aggregates) {
                        app.select_taxi(taxi_id);
                    }
                });
            });

        egui::CollapsingHeader::new("Average speed by trip")
            .default_open(true)
            .show(ui, |ui| {
                ui.group(|ui| render_line_chart(ui, &app.chart_trips));
            });

        egui::CollapsingHeader::new("Streets of the selected taxi")
            .default_open(true)
            .show(ui, |ui| {
                ui.group(|ui| render_pie_chart(ui, &app.pie, &app.selection));
            });
    });
}
