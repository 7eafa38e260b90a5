//! Top control strip: dataset source, demo data, tile endpoint, and status.

use eframe::egui::{self, Color32};

use crate::app::TripUiApp;

pub fn render_control_panel(ui: &mut egui::Ui, app: &mut TripUiApp) {
    ui.horizontal(|ui| {
        ui.label("Dataset:");
        ui.add(
            egui::TextEdit::singleline(&mut app.dataset_source)
                .desired_width(320.0)
                .hint_text("path or https:// URL"),
        );
        if ui
            .add_enabled(!app.loading, egui::Button::new("Load"))
            .clicked()
        {
            app.start_load();
        }
        if ui.button("Demo data").clicked() {
            app.load_demo();
        }
        if app.loading {
            ui.spinner();
            ui.label("loading dataset");
        }
    });

    ui.horizontal(|ui| {
        ui.label("Tile endpoint:");
        let endpoint = ui.add(
            egui::TextEdit::singleline(&mut app.tile_endpoint)
                .desired_width(320.0)
                .hint_text("https://host/{z}/{x}/{y}.mvt (optional)"),
        );
        if endpoint.changed() {
            app.apply_tile_endpoint();
        }
        if let Some(taxi_id) = app.selection.selected() {
            ui.label(format!("Selected taxi: {taxi_id}"));
        }
    });

    if let Some(error) = &app.load_error {
        ui.colored_label(Color32::from_rgb(220, 60, 60), error);
    } else if app.has_dataset() {
        ui.label(format!(
            "{} trips from {} taxis",
            app.records.len(),
            app.layer_groups.taxi_ids().count()
        ));
    }
}
