use serde_json::json;

use super::{ChartKind, ChartSpec};
use crate::data::filter::Subset;

pub const TITLE: &str = "Correlation Heatmap";
pub const TOO_FEW_ROWS: &str = "Not enough rows to compute correlations";
pub const NO_NUMERIC_COLUMNS: &str = "No numeric columns to correlate";
pub const UNDEFINED: &str = "Correlations are undefined for the selected rows";

/// Square correlation matrix over the numeric columns of a subset.
/// `None` marks an undefined coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().flatten().all(Option::is_none)
    }
}

/// Pearson correlation over the positions where both inputs are present.
///
/// Undefined with fewer than two complete pairs or when either side has zero
/// variance over those pairs.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlation across the given numeric columns, evaluated
/// over the subset's rows. `numeric` comes from `Table::numeric_columns` on the
/// whole table so the matrix shape does not depend on the filter.
pub fn correlation_matrix(subset: &Subset<'_>, numeric: &[usize]) -> CorrelationMatrix {
    let table = subset.table();

    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|&c| subset.rows().map(|r| r[c].as_numeric()).collect())
        .collect();

    let k = numeric.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|&c| table.columns[c].clone()).collect(),
        values,
    }
}

/// Heatmap of the correlation matrix. Degenerate subsets (fewer than two
/// rows, no numeric columns, every coefficient undefined) get a placeholder.
pub fn heatmap_chart(subset: &Subset<'_>, numeric: &[usize]) -> ChartSpec {
    if subset.len() < 2 {
        log::debug!("heatmap placeholder: {} row(s) selected", subset.len());
        return ChartSpec::placeholder(ChartKind::Heatmap, TOO_FEW_ROWS);
    }

    let matrix = correlation_matrix(subset, numeric);
    if matrix.columns.is_empty() {
        return ChartSpec::placeholder(ChartKind::Heatmap, NO_NUMERIC_COLUMNS);
    }
    if matrix.is_all_undefined() {
        log::debug!("heatmap placeholder: every coefficient undefined");
        return ChartSpec::placeholder(ChartKind::Heatmap, UNDEFINED);
    }

    let mut cells = Vec::with_capacity(matrix.columns.len() * matrix.columns.len());
    for (i, row_name) in matrix.columns.iter().enumerate() {
        for (j, col_name) in matrix.columns.iter().enumerate() {
            cells.push(json!({ "x": col_name, "y": row_name, "r": matrix.values[i][j] }));
        }
    }

    ChartSpec::new(
        ChartKind::Heatmap,
        TITLE,
        json!({
            "data": { "values": cells },
            "mark": "rect",
            "encoding": {
                "x": { "field": "x", "type": "nominal", "sort": matrix.columns, "title": null },
                "y": { "field": "y", "type": "nominal", "sort": matrix.columns, "title": null },
                "color": {
                    "field": "r",
                    "type": "quantitative",
                    "scale": { "scheme": "viridis", "domain": [-1, 1] }
                },
                "tooltip": [
                    { "field": "x", "type": "nominal" },
                    { "field": "y", "type": "nominal" },
                    { "field": "r", "type": "quantitative", "format": ".3f" }
                ]
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Table};

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    fn table() -> Table {
        let s = |v: &str| CellValue::String(v.to_string());
        Table::new(
            vec!["title".into(), "calories".into(), "fat".into(), "salt".into(), "vegan".into()],
            vec![
                vec![s("a"), CellValue::Integer(100), CellValue::Float(1.0), CellValue::Integer(5), CellValue::Bool(true)],
                vec![s("b"), CellValue::Integer(200), CellValue::Float(2.0), CellValue::Integer(5), CellValue::Bool(false)],
                vec![s("c"), CellValue::Integer(300), CellValue::Float(3.0), CellValue::Integer(5), CellValue::Bool(false)],
            ],
        )
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let y = [Some(2.0), Some(4.0), Some(6.0)];
        let z = [Some(3.0), Some(2.0), Some(1.0)];
        assert!(approx(pearson(&x, &y), 1.0));
        assert!(approx(pearson(&x, &z), -1.0));
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let x = [Some(1.0), None, Some(2.0), Some(3.0)];
        let y = [Some(1.0), Some(100.0), Some(2.0), None];
        // only (1,1) and (2,2) are complete
        assert!(approx(pearson(&x, &y), 1.0));
    }

    #[test]
    fn pearson_undefined_cases() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
        assert_eq!(pearson(&[Some(1.0), Some(1.0)], &[Some(2.0), Some(3.0)]), None);
        assert_eq!(pearson(&[], &[]), None);
    }

    #[test]
    fn matrix_covers_numeric_columns_only() {
        let t = table();
        let idx = vec![0, 1, 2];
        let m = correlation_matrix(&Subset::new(&t, &idx), &t.numeric_columns());
        assert_eq!(m.columns, vec!["calories", "fat", "salt", "vegan"]);
        assert!(approx(m.values[0][1], 1.0));
        assert_eq!(m.values[0][2], None, "zero-variance column is undefined");
        assert_eq!(m.values[2][2], None);
        assert_eq!(m.values[0][3], m.values[3][0]);
        assert!(approx(m.values[3][3], 1.0));
    }

    #[test]
    fn single_row_yields_placeholder() {
        let t = table();
        let idx = vec![1];
        let chart = heatmap_chart(&Subset::new(&t, &idx), &t.numeric_columns());
        assert!(chart.is_placeholder());
        assert_eq!(chart.placeholder.as_deref(), Some(TOO_FEW_ROWS));
        assert_eq!(chart.kind, ChartKind::Heatmap);
    }

    #[test]
    fn all_constant_columns_yield_placeholder() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(2)],
                vec![CellValue::Integer(1), CellValue::Integer(2)],
            ],
        );
        let idx = vec![0, 1];
        let chart = heatmap_chart(&Subset::new(&t, &idx), &t.numeric_columns());
        assert_eq!(chart.placeholder.as_deref(), Some(UNDEFINED));
    }

    #[test]
    fn no_numeric_columns_yield_placeholder() {
        let s = |v: &str| CellValue::String(v.to_string());
        let t = Table::new(vec!["title".into()], vec![vec![s("a")], vec![s("b")]]);
        let idx = vec![0, 1];
        let chart = heatmap_chart(&Subset::new(&t, &idx), &t.numeric_columns());
        assert_eq!(chart.placeholder.as_deref(), Some(NO_NUMERIC_COLUMNS));
    }

    #[test]
    fn heatmap_emits_square_grid_with_nulls() {
        let t = table();
        let idx = vec![0, 1, 2];
        let chart = heatmap_chart(&Subset::new(&t, &idx), &t.numeric_columns());
        assert!(!chart.is_placeholder());
        assert_eq!(chart.data_len(), 16);
        let cells = chart.vega_lite["data"]["values"].as_array().unwrap();
        assert!(cells.iter().any(|c| c["r"].is_null()));
        assert_eq!(chart.vega_lite["encoding"]["color"]["scale"]["scheme"], "viridis");
    }
}
