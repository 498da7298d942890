use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::export::TIMESTAMP_FORMAT;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// First rows of the time-indexed table.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.model.table else {
        return;
    };
    let rows = state.model.preview_len();

    ui.strong(format!("Preview (first {rows} of {} rows)", table.len()));

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(TableColumn::auto().at_least(140.0))
            .columns(TableColumn::auto().at_least(60.0), table.columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong(&table.index_name);
                });
                for column in &table.columns {
                    header.col(|ui| {
                        ui.strong(&column.name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows, |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.label(table.index[i].format(TIMESTAMP_FORMAT).to_string());
                    });
                    for column in &table.columns {
                        row.col(|ui| {
                            ui.label(column.values[i].to_string());
                        });
                    }
                });
            });
    });
}
