use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::charts::{recompute_all, Dashboard};
use crate::color::ColorMap;
use crate::data::filter::{CalorieBounds, FilterCriteria, FilterError, CALORIES, CUISINE};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::reconcile::{reconcile, ReconcileError, TITLE};

/// Slider granularity of the calorie range control.
pub const CALORIE_STEP: f64 = 50.0;
/// Spacing of labelled ticks on the calorie range control.
pub const CALORIE_MARK_SPACING: i64 = 500;

// ---------------------------------------------------------------------------
// Control options
// ---------------------------------------------------------------------------

/// What the input controls offer, derived once from the combined table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOptions {
    /// Distinct cuisines in first-appearance order.
    pub cuisines: Vec<String>,
    /// Initially selected cuisine (the first one).
    pub default_cuisine: Option<String>,
    /// Observed calorie range; the range inputs are bounded by it.
    pub calories: CalorieBounds,
    pub step: f64,
    /// Labelled tick positions, every 500 from the truncated minimum.
    pub marks: Vec<i64>,
    pub total_rows: usize,
}

impl DashboardOptions {
    pub fn from_table(table: &Table) -> Self {
        let cuisines: Vec<String> = table
            .unique_values(CUISINE)
            .iter()
            .map(|v| v.to_string())
            .collect();
        let calories = CalorieBounds::observed(table).unwrap_or_else(|| {
            log::warn!("no numeric '{CALORIES}' values; calorie range collapses to [0, 0]");
            CalorieBounds { min: 0.0, max: 0.0 }
        });
        let marks = (calories.min.trunc() as i64..calories.max.trunc() as i64)
            .step_by(CALORIE_MARK_SPACING as usize)
            .collect();

        DashboardOptions {
            default_cuisine: cuisines.first().cloned(),
            cuisines,
            calories,
            step: CALORIE_STEP,
            marks,
            total_rows: table.len(),
        }
    }

    /// Selection shown before the user touches anything.
    pub fn default_criteria(&self) -> Option<FilterCriteria> {
        self.default_cuisine
            .as_ref()
            .map(|c| FilterCriteria::new(c.clone(), self.calories.min, self.calories.max))
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything request handlers need. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Combined (reconciled) table.
    pub table: Arc<Table>,
    /// Numeric columns of the combined table, fed to the heatmap.
    pub numeric_columns: Arc<Vec<usize>>,
    pub options: Arc<DashboardOptions>,
    /// Cuisine colours, fixed for the life of the process.
    pub colors: Arc<ColorMap>,
}

impl AppState {
    /// Ingest the combined table: check its columns, derive control options
    /// and the colour map.
    pub fn new(table: Table) -> Result<Self, ReconcileError> {
        for column in [TITLE, CUISINE, CALORIES] {
            if !table.has_column(column) {
                return Err(ReconcileError::Schema {
                    dataset: "combined",
                    column,
                });
            }
        }

        let options = DashboardOptions::from_table(&table);
        let colors = ColorMap::new(CUISINE, &table.unique_values(CUISINE));
        let numeric_columns = table.numeric_columns();
        log::debug!("{} numeric columns in combined table", numeric_columns.len());

        Ok(AppState {
            table: Arc::new(table),
            numeric_columns: Arc::new(numeric_columns),
            options: Arc::new(options),
            colors: Arc::new(colors),
        })
    }

    /// Validate the criteria and rebuild every chart. Ranges outside the
    /// observed calories are taken as given and may match nothing.
    pub fn dashboard(&self, criteria: &FilterCriteria) -> Result<Dashboard, FilterError> {
        criteria.validate()?;
        Ok(recompute_all(
            &self.table,
            &self.numeric_columns,
            criteria,
            &self.colors,
        ))
    }
}

/// Startup pipeline: load both datasets, reconcile them and derive the
/// shared state. Any failure here is fatal to the process.
pub fn load(healthy: &Path, epicurious: &Path) -> Result<AppState> {
    let healthy = load_file(healthy).context("loading healthy-diet dataset")?;
    let epicurious = load_file(epicurious).context("loading epicurious dataset")?;

    let combined = reconcile(healthy, epicurious)?;
    log::info!(
        "Combined table: {} rows, {} columns",
        combined.len(),
        combined.columns.len()
    );

    let state = AppState::new(combined)?;
    log::info!(
        "{} cuisines, calories in [{}, {}]",
        state.options.cuisines.len(),
        state.options.calories.min,
        state.options.calories.max
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(calories: &[i64]) -> Table {
        let s = |v: &str| CellValue::String(v.to_string());
        let cuisines = ["italian", "italian", "french"];
        Table::new(
            vec![TITLE.into(), CUISINE.into(), CALORIES.into()],
            calories
                .iter()
                .zip(cuisines.iter().cycle())
                .enumerate()
                .map(|(i, (c, cuisine))| vec![s(&format!("r{i}")), s(*cuisine), CellValue::Integer(*c)])
                .collect(),
        )
    }

    #[test]
    fn options_follow_table() {
        let opts = DashboardOptions::from_table(&table(&[120, 1800, 640]));
        assert_eq!(opts.cuisines, vec!["italian", "french"]);
        assert_eq!(opts.default_cuisine.as_deref(), Some("italian"));
        assert_eq!(opts.calories, CalorieBounds { min: 120.0, max: 1800.0 });
        assert_eq!(opts.marks, vec![120, 620, 1120, 1620]);
        assert_eq!(opts.step, 50.0);

        let crit = opts.default_criteria().unwrap();
        assert_eq!(crit, FilterCriteria::new("italian", 120.0, 1800.0));
    }

    #[test]
    fn empty_table_has_no_default_selection() {
        let opts = DashboardOptions::from_table(&table(&[]));
        assert!(opts.cuisines.is_empty());
        assert!(opts.default_criteria().is_none());
        assert!(opts.marks.is_empty());
    }

    #[test]
    fn requires_filter_columns() {
        let t = Table::new(vec![TITLE.into(), CALORIES.into()], vec![]);
        assert_eq!(
            AppState::new(t).unwrap_err(),
            ReconcileError::Schema { dataset: "combined", column: CUISINE }
        );
    }

    #[test]
    fn load_joins_files_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("epi_r.csv");
        let b = dir.path().join("All_Diets.csv");
        std::fs::write(&a, "title,calories,rating,protein\nLentil Soup ,320,4.5,18\nStew,610,3.75,42\n").unwrap();
        std::fs::write(
            &b,
            "Diet_type,Recipe_name,Cuisine_type,Protein(g),Fat(g)\nvegan,lentil soup,indian,17,5\n",
        )
        .unwrap();

        let state = load(&a, &b).unwrap();
        assert_eq!(state.table.len(), 1);
        assert!(state.table.has_column("protein_healthy"));
        assert!(state.table.has_column("protein_epi"));
        assert_eq!(state.options.cuisines, vec!["indian"]);
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load(&dir.path().join("a.csv"), &dir.path().join("b.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("healthy-diet"));
    }

    #[test]
    fn dashboard_takes_ranges_beyond_observed_bounds_as_given() {
        let state = AppState::new(table(&[200, 800, 300])).unwrap();
        let d = state.dashboard(&FilterCriteria::new("italian", -1e6, 1e6)).unwrap();
        assert_eq!(d.matched_rows, 2);
        let d = state.dashboard(&FilterCriteria::new("italian", 900.0, 1000.0)).unwrap();
        assert_eq!(d.matched_rows, 0);
        assert_eq!(d.scatter.data_len(), 0);
        assert!(state.dashboard(&FilterCriteria::new("italian", 900.0, 100.0)).is_err());
    }

    #[test]
    fn numeric_columns_computed_once() {
        let state = AppState::new(table(&[200, 800, 300])).unwrap();
        assert_eq!(*state.numeric_columns, vec![2]);
    }
}
