use serde_json::{json, Map, Value};

use super::{ChartKind, ChartSpec};
use crate::color::ColorMap;
use crate::data::filter::{Subset, CALORIES, CUISINE};
use crate::data::reconcile::TITLE as TITLE_COLUMN;

pub const TITLE: &str = "Calories vs Rating";
pub const RATING: &str = "rating";

/// Rating (x) against calories (y), one point per row, coloured by cuisine.
/// Colours come from `colors` so they stay fixed across filter changes.
pub fn scatter_chart(subset: &Subset<'_>, colors: &ColorMap) -> ChartSpec {
    let table = subset.table();
    let fields = [RATING, CALORIES, CUISINE, TITLE_COLUMN];
    let positions: Vec<(&str, Option<usize>)> = fields
        .iter()
        .map(|f| (*f, table.column_index(f)))
        .collect();

    let values: Vec<Value> = subset
        .rows()
        .map(|row| {
            let point: Map<String, Value> = positions
                .iter()
                .map(|(name, idx)| (name.to_string(), json!(idx.map(|i| &row[i]))))
                .collect();
            Value::Object(point)
        })
        .collect();

    let (domain, range): (Vec<String>, Vec<String>) = colors.legend_entries().into_iter().unzip();

    ChartSpec::new(
        ChartKind::Scatter,
        TITLE,
        json!({
            "data": { "values": values },
            "mark": { "type": "point", "filled": true },
            "encoding": {
                "x": { "field": RATING, "type": "quantitative" },
                "y": { "field": CALORIES, "type": "quantitative" },
                "color": {
                    "field": CUISINE,
                    "type": "nominal",
                    "scale": { "domain": domain, "range": range }
                },
                "tooltip": [
                    { "field": TITLE_COLUMN, "type": "nominal" },
                    { "field": RATING, "type": "quantitative" },
                    { "field": CALORIES, "type": "quantitative" }
                ]
            }
        }),
    )
}
