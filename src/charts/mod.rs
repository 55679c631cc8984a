//! Chart builders: filtered rows → Vega-Lite chart descriptors.
//!
//! Every builder is a pure function of a [`Subset`]. Insufficient data never
//! fails; it yields a placeholder chart carrying an explanatory label.

use serde::Serialize;
use serde_json::{json, Value};

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, FilterCriteria, Subset};
use crate::data::model::Table;

pub mod bar;
pub mod heatmap;
pub mod line;
pub mod scatter;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Scatter,
    Heatmap,
    Line,
}

/// A finished chart. Not mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Set when the chart carries a label instead of plotted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Vega-Lite v5 specification, renderable with vega-embed.
    pub vega_lite: Value,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: &str, body: Value) -> Self {
        let mut vega_lite = json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": title,
            "width": "container",
            "height": 320,
        });
        if let (Some(target), Value::Object(extra)) = (vega_lite.as_object_mut(), body) {
            target.extend(extra);
        }
        ChartSpec {
            kind,
            title: title.to_string(),
            placeholder: None,
            vega_lite,
        }
    }

    /// A chart showing only `label`, used when the data cannot be plotted.
    pub fn placeholder(kind: ChartKind, label: &str) -> Self {
        let mut spec = ChartSpec::new(
            kind,
            label,
            json!({
                "data": { "values": [{ "label": label }] },
                "mark": { "type": "text", "fontSize": 14, "color": "#7f8c8d" },
                "encoding": { "text": { "field": "label", "type": "nominal" } },
            }),
        );
        spec.placeholder = Some(label.to_string());
        spec
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Number of inline data records in the chart body.
    pub fn data_len(&self) -> usize {
        self.vega_lite["data"]["values"]
            .as_array()
            .map_or(0, Vec::len)
    }
}

/// All four charts, always recomputed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Number of rows that passed the filter.
    pub matched_rows: usize,
    pub bar: ChartSpec,
    pub scatter: ChartSpec,
    pub heatmap: ChartSpec,
    pub line: ChartSpec,
}

/// Filter the combined table and rebuild every chart from the result.
/// `numeric` lists the table's numeric columns for the heatmap.
pub fn recompute_all(
    table: &Table,
    numeric: &[usize],
    criteria: &FilterCriteria,
    colors: &ColorMap,
) -> Dashboard {
    let indices = filtered_indices(table, criteria);
    let subset = Subset::new(table, &indices);
    log::debug!(
        "recomputing dashboard for cuisine={:?} calories=[{}, {}]: {} rows",
        criteria.cuisine,
        criteria.calorie_min,
        criteria.calorie_max,
        subset.len()
    );

    Dashboard {
        matched_rows: subset.len(),
        bar: bar::bar_chart(&subset),
        scatter: scatter::scatter_chart(&subset, colors),
        heatmap: heatmap::heatmap_chart(&subset, numeric),
        line: line::line_chart(&subset),
    }
}
