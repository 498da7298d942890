use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

/// Share of the central panel given to the chart when a preview follows it.
const PLOT_SHARE: f32 = 0.6;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct WaterDashboardApp {
    pub state: AppState,
}

impl eframe::App for WaterDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart + preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    if state.upload.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to start  (File → Open…)");
        });
        return;
    }

    ui.heading("Water quality over time");

    if let Some(notice) = &state.model.notice {
        panels::notice(ui, notice);
    }

    if state.model.chart_ready() {
        let height = ui.available_height() * PLOT_SHARE;
        plot::time_series_plot(ui, state, height);
        ui.separator();
    }

    table::preview_table(ui, state);
}
