use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Rows are deduplicated through `HashSet` and colour maps key on values in a
/// `BTreeMap`, so `CellValue` must be `Eq + Hash + Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord: floats compare by total order, so NaN == NaN --

/// Fold `-0.0` onto `0.0` so both compare and hash alike.
fn canonical(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else {
        f
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => canonical(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Cells serialize as plain JSON scalars so chart bodies can embed them.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) | CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (integers and floats only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric view used by correlation: booleans count as 0/1.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.as_f64(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – an ordered set of named columns over row-major cells
// ---------------------------------------------------------------------------

/// A loaded dataset. Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding short rows with `Null` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Distinct non-null values of a column in first-appearance order.
    pub fn unique_values(&self, column: &str) -> Vec<CellValue> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| &r[idx])
            .filter(|v| !v.is_null())
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }

    /// `(min, max)` over the numeric cells of a column.
    pub fn numeric_range(&self, column: &str) -> Option<(f64, f64)> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .filter_map(|r| r[idx].as_f64())
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Indices of columns whose non-null cells are all numeric or boolean,
    /// with at least one non-null cell.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&c| {
                let mut any = false;
                for row in &self.rows {
                    match &row[c] {
                        CellValue::Null => {}
                        CellValue::Integer(_) | CellValue::Float(_) | CellValue::Bool(_) => {
                            any = true
                        }
                        _ => return false,
                    }
                }
                any
            })
            .collect()
    }

    /// Drop exact-duplicate rows, keeping the first occurrence.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<CellValue>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Rename columns per `(from, to)` pair. Absent source names are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for (from, to) in renames {
            if let Some(idx) = self.column_index(from) {
                self.columns[idx] = (*to).to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn sample() -> Table {
        Table::new(
            vec!["title".into(), "calories".into(), "vegan".into()],
            vec![
                vec![s("soup"), CellValue::Integer(200), CellValue::Bool(true)],
                vec![s("stew"), CellValue::Float(450.5), CellValue::Bool(false)],
                vec![s("soup"), CellValue::Integer(200), CellValue::Bool(true)],
                vec![s("salad"), CellValue::Null, CellValue::Null],
            ],
        )
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut t = sample();
        assert_eq!(t.dedup_rows(), 1);
        assert_eq!(t.len(), 3);
        assert_eq!(t.rows[0][0], s("soup"));
        assert_eq!(t.rows[2][0], s("salad"));
    }

    #[test]
    fn dedup_treats_nan_as_equal() {
        let mut t = Table::new(
            vec!["x".into()],
            vec![vec![CellValue::Float(f64::NAN)], vec![CellValue::Float(f64::NAN)]],
        );
        assert_eq!(t.dedup_rows(), 1);
    }

    #[test]
    fn dedup_treats_signed_zeros_as_equal() {
        let mut t = Table::new(
            vec!["x".into()],
            vec![vec![CellValue::Float(0.0)], vec![CellValue::Float(-0.0)]],
        );
        assert_eq!(CellValue::Float(-0.0), CellValue::Float(0.0));
        assert_eq!(t.dedup_rows(), 1);
    }

    #[test]
    fn rename_ignores_missing_columns() {
        let mut t = sample();
        t.rename_columns(&[("calories", "kcal"), ("nope", "still_nope")]);
        assert_eq!(t.columns, vec!["title", "kcal", "vegan"]);
    }

    #[test]
    fn unique_values_preserve_appearance_order() {
        let t = sample();
        assert_eq!(t.unique_values("title"), vec![s("soup"), s("stew"), s("salad")]);
        assert!(t.unique_values("missing").is_empty());
    }

    #[test]
    fn numeric_range_skips_nulls() {
        assert_eq!(sample().numeric_range("calories"), Some((200.0, 450.5)));
        assert_eq!(sample().numeric_range("title"), None);
    }

    #[test]
    fn numeric_columns_include_bools() {
        assert_eq!(sample().numeric_columns(), vec![1, 2]);
    }

    #[test]
    fn new_pads_short_rows() {
        let t = Table::new(vec!["a".into(), "b".into()], vec![vec![CellValue::Integer(1)]]);
        assert_eq!(t.rows[0], vec![CellValue::Integer(1), CellValue::Null]);
    }

    #[test]
    fn serializes_as_json_scalars() {
        let row = vec![s("a"), CellValue::Integer(3), CellValue::Float(f64::NAN), CellValue::Null];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["a",3,null,null]"#);
    }
}
