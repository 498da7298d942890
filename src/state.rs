use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::loader::{read_upload, UploadedFile};
use crate::data::options::PipelineConfig;
use crate::data::pipeline::{Pipeline, RenderModel};
use crate::data::selection;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Current file (None until the user opens one).
    pub upload: Option<UploadedFile>,

    /// Settings form.
    pub config: PipelineConfig,

    pub pipeline: Pipeline,

    /// Output of the last pipeline run.
    pub model: RenderModel,

    /// Line colour per numeric column.
    pub color_map: ColorMap,

    /// I/O error shown in the top bar (pipeline notices live in `model`).
    pub status_message: Option<String>,
}

impl AppState {
    /// Replace the current file and run the pipeline on it.
    pub fn set_upload(&mut self, upload: UploadedFile) {
        self.pipeline.reset();
        self.config.selected_parameters = None;
        self.upload = Some(upload);
        self.status_message = None;
        self.rerun();
    }

    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let upload = read_upload(path)?;
        log::info!("Opened {} ({} bytes)", upload.name, upload.bytes.len());
        self.set_upload(upload);
        Ok(())
    }

    /// Re-run the pipeline after a settings change.
    pub fn rerun(&mut self) {
        if let Some(upload) = &self.upload {
            self.model = self.pipeline.run(upload, &self.config);
            self.color_map = ColorMap::new(&self.model.numeric_columns);
        }
    }

    /// Toggle one parameter in the selection.
    pub fn toggle_parameter(&mut self, name: &str) {
        let next = selection::toggle(&self.model.selected, &self.model.numeric_columns, name);
        self.config.selected_parameters = Some(next);
        self.rerun();
    }

    pub fn select_all(&mut self) {
        self.config.selected_parameters = Some(self.model.numeric_columns.clone());
        self.rerun();
    }

    pub fn select_none(&mut self) {
        self.config.selected_parameters = Some(Vec::new());
        self.rerun();
    }

    /// Write the filtered data to `path`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let csv = self.model.export_csv()?;
        std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} parameters to {}", self.model.selected.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::PipelineError;

    const CSV: &str = "tijd;temp;ph;o2;ec\n\
        01-01-2024 00:00;10,5;7,1;9,0;410\n\
        01-01-2024 00:05;11,0;7,2;9,1;415\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.config.parse.decimal_mark = crate::data::options::DecimalMark::Comma;
        state.set_upload(UploadedFile::new("meting.csv", CSV.as_bytes().to_vec()));
        state
    }

    #[test]
    fn upload_selects_first_three_parameters() {
        let state = loaded();
        assert!(state.model.notice.is_none());
        assert_eq!(state.model.numeric_columns, ["temp", "ph", "o2", "ec"]);
        assert_eq!(state.model.selected, ["temp", "ph", "o2"]);
    }

    #[test]
    fn toggling_updates_selection() {
        let mut state = loaded();
        state.toggle_parameter("ph");
        assert_eq!(state.model.selected, ["temp", "o2"]);
        state.toggle_parameter("ec");
        assert_eq!(state.model.selected, ["temp", "o2", "ec"]);
    }

    #[test]
    fn select_none_raises_info_notice() {
        let mut state = loaded();
        state.select_none();
        assert_eq!(state.model.notice, Some(PipelineError::NoParametersSelected));
        state.select_all();
        assert_eq!(state.model.selected.len(), 4);
        assert!(state.model.notice.is_none());
    }

    #[test]
    fn settings_change_reuses_cached_parse() {
        let mut state = loaded();
        state.config.rolling_window = 2;
        state.rerun();
        assert_eq!(state.pipeline.cache().misses(), 1);
        assert_eq!(state.pipeline.cache().hits(), 1);
    }

    #[test]
    fn export_writes_file() {
        let state = loaded();
        let path = std::env::temp_dir().join(format!("water-dashboard-export-{}.csv", std::process::id()));
        state.export_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(written.starts_with("tijd,temp,ph,o2\n"));
        assert!(written.contains("2024-01-01 00:05:00,11.0,7.2,9.1"));
    }
}
