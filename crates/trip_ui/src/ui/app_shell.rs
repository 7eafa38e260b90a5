use std::time::Duration;

use eframe::egui;

use crate::app::TripUiApp;
use crate::ui::controls::render_control_panel;
use crate::ui::dashboard::render_dashboard;

pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Taxi Trip Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(TripUiApp::new()))),
    )
}

impl eframe::App for TripUiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        // Worker threads (dataset load, tile fetches) report over channels,
        // so keep repainting while any are outstanding.
        if self.loading || self.tiles.has_inflight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            render_control_panel(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            render_dashboard(ui, self);
        });
    }
}
