use std::sync::Arc;

use anyhow::Result;

use super::cache::ParseCache;
use super::error::PipelineError;
use super::export;
use super::loader::UploadedFile;
use super::model::{TimeIndexedTable, TransformedTable};
use super::options::PipelineConfig;
use super::selection;
use super::transform::transform;

/// Rows of the time-indexed table shown in the preview.
pub const PREVIEW_ROWS: usize = 50;

// ---------------------------------------------------------------------------
// RenderModel – everything the UI needs after one run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RenderModel {
    /// Time-indexed table, source of the preview.
    pub table: Option<Arc<TimeIndexedTable>>,
    /// Columns offered for plotting / export.
    pub numeric_columns: Vec<String>,
    /// Resolved parameter selection.
    pub selected: Vec<String>,
    /// Resampled / smoothed table feeding the chart and the export.
    pub transformed: Option<TransformedTable>,
    /// Message to show instead of (or next to) the output.
    pub notice: Option<PipelineError>,
}

impl RenderModel {
    fn halted(notice: PipelineError) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    /// Number of rows the preview should show.
    pub fn preview_len(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.len().min(PREVIEW_ROWS))
    }

    /// A chart (and an export) is only offered when something is selected.
    pub fn chart_ready(&self) -> bool {
        self.transformed.is_some() && !self.selected.is_empty()
    }

    /// CSV of the transformed table restricted to the selected parameters.
    pub fn export_csv(&self) -> Result<String> {
        match &self.transformed {
            Some(table) => export::to_csv(table, &self.selected),
            None => Err(self
                .notice
                .clone()
                .unwrap_or(PipelineError::NoParametersSelected)
                .into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Parse → index → transform, run once per user interaction.
///
/// Only the parse + index stage is cached; selection and transforms are
/// recomputed on every run.
#[derive(Debug, Default)]
pub struct Pipeline {
    cache: ParseCache,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, source: &UploadedFile, config: &PipelineConfig) -> RenderModel {
        let table = match self.cache.get_or_parse(source, &config.parse) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to read {}: {e}", source.name);
                return RenderModel::halted(e);
            }
        };

        let numeric_columns = table.numeric_columns();
        if numeric_columns.is_empty() {
            log::warn!("{} has no numeric columns", source.name);
            return RenderModel::halted(PipelineError::NoNumericColumns);
        }

        let selected = selection::resolve(
            &numeric_columns,
            config.selected_parameters.as_deref(),
        );
        let transformed = transform(&table, config.resample, config.rolling_window);
        log::debug!(
            "Run: {} rows -> {} rows (resample {}, window {})",
            table.len(),
            transformed.len(),
            config.resample,
            config.rolling_window
        );

        let notice = selected
            .is_empty()
            .then_some(PipelineError::NoParametersSelected);

        RenderModel {
            table: Some(table),
            numeric_columns,
            selected,
            transformed: Some(transformed),
            notice,
        }
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Drop the cached parse, e.g. when a new file replaces the current one.
    pub fn reset(&mut self) {
        self.cache.invalidate();
    }
}
