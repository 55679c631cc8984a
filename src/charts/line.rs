use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::json;

use super::{ChartKind, ChartSpec};
use crate::data::filter::Subset;
use crate::data::model::{CellValue, Table};

pub const TITLE: &str = "Recipe Trends Over Time";
pub const NO_DATE: &str = "No Date Information Available";

/// Column names treated as a recipe date, including the join-suffixed forms.
const DATE_COLUMNS: &[&str] = &["date", "date_healthy", "date_epi"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// First date-like column of the table.
pub fn date_column(table: &Table) -> Option<usize> {
    table
        .columns
        .iter()
        .position(|c| DATE_COLUMNS.iter().any(|d| c.eq_ignore_ascii_case(d)))
}

/// Parse a cell as a calendar date. Anything unparseable is `None`.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    let text = cell.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Recipes per day, ascending, with a running total.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub points: Vec<TrendPoint>,
    /// Rows whose date was missing or unparseable.
    pub missing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
    pub cumulative: usize,
}

pub fn daily_trend(subset: &Subset<'_>, date_idx: usize) -> Trend {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut missing = 0;
    for row in subset.rows() {
        match parse_date(&row[date_idx]) {
            Some(d) => *per_day.entry(d).or_default() += 1,
            None => missing += 1,
        }
    }

    let mut running = 0;
    let points = per_day
        .into_iter()
        .map(|(date, count)| {
            running += count;
            TrendPoint {
                date,
                count,
                cumulative: running,
            }
        })
        .collect();

    Trend { points, missing }
}

/// Recipe count over time, or the "no date" placeholder when the table has
/// no date-like column.
pub fn line_chart(subset: &Subset<'_>) -> ChartSpec {
    let Some(date_idx) = date_column(subset.table()) else {
        return ChartSpec::placeholder(ChartKind::Line, NO_DATE);
    };

    let trend = daily_trend(subset, date_idx);
    if trend.missing > 0 {
        log::debug!("line chart: {} row(s) without a parseable date", trend.missing);
    }

    let values: Vec<_> = trend
        .points
        .iter()
        .map(|p| {
            json!({
                "date": p.date.format("%Y-%m-%d").to_string(),
                "count": p.count,
                "cumulative": p.cumulative,
            })
        })
        .collect();

    let mut spec = ChartSpec::new(
        ChartKind::Line,
        TITLE,
        json!({
            "data": { "values": values },
            "mark": {
                "type": "line",
                "strokeWidth": 2,
                "point": { "size": 36, "opacity": 0.8 }
            },
            "encoding": {
                "x": { "field": "date", "type": "temporal" },
                "y": { "field": "count", "type": "quantitative", "title": "Recipes" },
                "tooltip": [
                    { "field": "date", "type": "temporal" },
                    { "field": "count", "type": "quantitative" },
                    { "field": "cumulative", "type": "quantitative" }
                ]
            }
        }),
    );
    if trend.missing > 0 {
        spec.vega_lite["description"] =
            json!(format!("{} row(s) with a missing or unparseable date omitted", trend.missing));
    }
    spec
}
