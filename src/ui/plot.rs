use chrono::{DateTime, NaiveDateTime};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints};

use crate::data::model::TransformedTable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Time-series plot (central panel)
// ---------------------------------------------------------------------------

/// Seconds since the Unix epoch, used as the plot's x coordinate.
fn to_x(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn format_x(x: f64) -> String {
    DateTime::from_timestamp(x.round() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Split a column into runs of present values so missing values show as gaps.
fn segments(table: &TransformedTable, column: &str) -> Vec<Vec<[f64; 2]>> {
    let Some(col) = table.column(column) else {
        return Vec::new();
    };

    let mut out: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for (ts, value) in table.index.iter().zip(&col.values) {
        match value.as_f64() {
            Some(v) => current.push([to_x(ts), v]),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Render the selected parameters over time.
pub fn time_series_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(table) = &state.model.transformed else {
        return;
    };

    Plot::new("time_series_plot")
        .height(height)
        .legend(Legend::default())
        .show_grid(true)
        .x_axis_label(table.index_name.clone())
        .y_axis_label("Value")
        .x_axis_formatter(|mark, _range| format_x(mark.value))
        .label_formatter(|name, point: &PlotPoint| {
            if name.is_empty() {
                format!("{}\n{:.3}", format_x(point.x), point.y)
            } else {
                format!("{name}\n{}\n{:.3}", format_x(point.x), point.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for name in &state.model.selected {
                let color = state.color_map.color_for(name);
                // Same name on every segment keeps a single legend entry.
                for segment in segments(table, name) {
                    let line = Line::new(PlotPoints::from(segment))
                        .name(name)
                        .color(color)
                        .width(1.5);
                    plot_ui.line(line);
                }
            }
        });
}
