use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → colour
// ---------------------------------------------------------------------------

const DEFAULT_COLOR: &str = "#808080";

/// Maps the values of a category column to distinct colours. Built once from
/// the full table so a category keeps its colour whatever the filter shows.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    /// Values in the order colours were assigned.
    order: Vec<CellValue>,
    mapping: BTreeMap<CellValue, String>,
}

impl ColorMap {
    /// Build a colour map for the given column from its distinct values.
    pub fn new(column: &str, values: &[CellValue]) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CellValue, String> = values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            column: column.to_string(),
            order: values.to_vec(),
            mapping,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Legend entries (value label → colour) in assignment order.
    pub fn legend_entries(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .map(|v| (v.to_string(), self.color_for(v).to_string()))
            .collect()
    }
}
