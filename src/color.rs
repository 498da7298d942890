use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: parameter name → Color32
// ---------------------------------------------------------------------------

/// One colour per numeric column, assigned over the whole column universe so
/// a parameter keeps its colour when the selection changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(parameters: &[String]) -> Self {
        let mapping = parameters
            .iter()
            .cloned()
            .zip(generate_palette(parameters.len()))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, parameter: &str) -> Color32 {
        self.mapping.get(parameter).copied().unwrap_or(Color32::GRAY)
    }
}
