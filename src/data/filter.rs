use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CellValue, Table};

/// Category column the cuisine selector binds to.
pub const CUISINE: &str = "Cuisine_type";
/// Numeric column the calorie range binds to.
pub const CALORIES: &str = "calories";

// ---------------------------------------------------------------------------
// Filter predicate: one cuisine and an inclusive calorie range
// ---------------------------------------------------------------------------

/// User selection, recreated on every interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub cuisine: String,
    pub calorie_min: f64,
    pub calorie_max: f64,
}

/// Observed `[min, max]` of the calories column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalorieBounds {
    pub min: f64,
    pub max: f64,
}

impl CalorieBounds {
    /// Bounds of the calories column; `None` when it has no numeric cells.
    pub fn observed(table: &Table) -> Option<Self> {
        table
            .numeric_range(CALORIES)
            .map(|(min, max)| CalorieBounds { min, max })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("calorie range bounds must be finite numbers")]
    NonFinite,
    #[error("calorie_min ({min}) is greater than calorie_max ({max})")]
    InvertedRange { min: f64, max: f64 },
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl FilterCriteria {
    pub fn new(cuisine: impl Into<String>, calorie_min: f64, calorie_max: f64) -> Self {
        FilterCriteria {
            cuisine: cuisine.into(),
            calorie_min,
            calorie_max,
        }
    }

    /// Check `calorie_min <= calorie_max` with both finite.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.calorie_min.is_finite() || !self.calorie_max.is_finite() {
            return Err(FilterError::NonFinite);
        }
        if self.calorie_min > self.calorie_max {
            return Err(FilterError::InvertedRange {
                min: self.calorie_min,
                max: self.calorie_max,
            });
        }
        Ok(())
    }

    /// Row predicate: cuisine equal and calories within the inclusive range.
    /// Rows with a missing cuisine or calorie value never match. Non-text
    /// cuisine cells compare by their displayed form, as listed in the selector.
    pub fn matches(&self, cuisine: &CellValue, calories: &CellValue) -> bool {
        let cuisine_ok = match cuisine {
            CellValue::Null => false,
            CellValue::String(s) | CellValue::Date(s) => *s == self.cuisine,
            other => other.to_string() == self.cuisine,
        };
        let calories_ok = calories
            .as_f64()
            .is_some_and(|c| self.calorie_min <= c && c <= self.calorie_max);
        cuisine_ok && calories_ok
    }
}

// ---------------------------------------------------------------------------
// Subset – a borrowed row selection of a table
// ---------------------------------------------------------------------------

/// Rows of a table selected by index. Never copies or mutates the table.
#[derive(Debug, Clone, Copy)]
pub struct Subset<'a> {
    table: &'a Table,
    indices: &'a [usize],
}

impl<'a> Subset<'a> {
    pub fn new(table: &'a Table, indices: &'a [usize]) -> Self {
        Subset { table, indices }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [CellValue]> + 'a {
        let (table, indices) = (self.table, self.indices);
        indices.iter().map(move |&i| table.rows[i].as_slice())
    }

    /// Values of one column over the selected rows; `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let idx = self.table.column_index(name)?;
        Some(self.rows().map(move |r| &r[idx]))
    }
}

/// Return indices of rows that pass the criteria, in table order.
///
/// An empty result is not an error. A table without the cuisine or calorie
/// column matches nothing.
pub fn filtered_indices(table: &Table, criteria: &FilterCriteria) -> Vec<usize> {
    let (Some(cuisine), Some(calories)) =
        (table.column_index(CUISINE), table.column_index(CALORIES))
    else {
        return Vec::new();
    };

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| criteria.matches(&row[cuisine], &row[calories]))
        .map(|(i, _)| i)
        .collect()
}
