use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::error::{PipelineError, Severity};
use crate::data::export::EXPORT_FILE_NAME;
use crate::data::options::{DecimalMark, Delimiter, ResampleRule};
use crate::state::AppState;

/// Upper bound of the moving-average window in the settings form.
const MAX_ROLLING_WINDOW: usize = 1000;

// ---------------------------------------------------------------------------
// Left side panel – settings form
// ---------------------------------------------------------------------------

/// Render the settings panel. Any change triggers one pipeline run.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    // Parameter toggles re-run on their own.
    let before = (
        state.config.parse,
        state.config.resample,
        state.config.rolling_window,
    );

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Decimal mark");
            egui::ComboBox::from_id_salt("decimal_mark")
                .selected_text(state.config.parse.decimal_mark.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for mark in DecimalMark::ALL {
                        ui.selectable_value(&mut state.config.parse.decimal_mark, mark, mark.label());
                    }
                });

            ui.strong("Delimiter");
            egui::ComboBox::from_id_salt("delimiter")
                .selected_text(state.config.parse.delimiter.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for delimiter in Delimiter::ALL {
                        ui.selectable_value(
                            &mut state.config.parse.delimiter,
                            delimiter,
                            delimiter.label(),
                        );
                    }
                });

            ui.checkbox(&mut state.config.parse.dayfirst, "Day-first dates (EU format)");
            ui.separator();

            ui.strong("Resampling");
            egui::ComboBox::from_id_salt("resample")
                .selected_text(state.config.resample.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for rule in ResampleRule::ALL {
                        ui.selectable_value(&mut state.config.resample, rule, rule.label());
                    }
                });

            ui.strong("Moving average (points)");
            ui.add(
                egui::DragValue::new(&mut state.config.rolling_window)
                    .range(0..=MAX_ROLLING_WINDOW),
            );
            ui.separator();

            parameter_list(ui, state);
        });

    let after = (
        state.config.parse,
        state.config.resample,
        state.config.rolling_window,
    );
    if after != before {
        log::debug!("Settings changed: {:?}", state.config);
        state.rerun();
    }
}

fn parameter_list(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Parameters");
    if state.model.numeric_columns.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let columns = state.model.numeric_columns.clone();
    for col in &columns {
        let mut checked = state.model.selected.contains(col);
        let text = RichText::new(col).color(state.color_map.color_for(col));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_parameter(col);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.model.chart_ready();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(upload), Some(table)) = (&state.upload, &state.model.table) {
            ui.label(format!(
                "{}: {} rows, {} numeric columns",
                upload.name,
                table.len(),
                state.model.numeric_columns.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Coloured notice for a pipeline error, warning or hint.
pub fn notice(ui: &mut Ui, notice: &PipelineError) {
    let color = match notice.severity() {
        Severity::Error => Color32::RED,
        Severity::Warning => Color32::YELLOW,
        Severity::Info => Color32::LIGHT_BLUE,
    };
    ui.label(RichText::new(notice.to_string()).color(color));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement data")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to open file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
