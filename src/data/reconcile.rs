use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{CellValue, Table};

/// Join key shared by both datasets after renaming.
pub const TITLE: &str = "title";

/// Column renames applied to the epicurious dataset so it lines up with the
/// healthy-diet dataset.
pub const EPICURIOUS_RENAMES: &[(&str, &str)] = &[
    ("Recipe_name", TITLE),
    ("Protein(g)", "protein"),
    ("Fat(g)", "fat"),
];

pub const HEALTHY_SUFFIX: &str = "_healthy";
pub const EPICURIOUS_SUFFIX: &str = "_epi";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("schema error: {dataset} dataset has no '{column}' column")]
    Schema {
        dataset: &'static str,
        column: &'static str,
    },
}

/// Lower-case and trim a join key. Idempotent.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Join key of a title cell. Text-like cells (including titles that happened
/// to parse as numbers) are normalized; null titles never join.
fn title_key(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Float(v) if v.is_nan() => None,
        CellValue::String(s) | CellValue::Date(s) => Some(normalize_title(s)),
        other => Some(normalize_title(&other.to_string())),
    }
}

fn normalize_title_column(table: &mut Table, idx: usize) {
    for row in &mut table.rows {
        row[idx] = match title_key(&row[idx]) {
            Some(key) => CellValue::String(key),
            None => CellValue::Null,
        };
    }
}

/// Reconcile the healthy-diet table (`healthy`) with the epicurious table
/// (`epicurious`) into one combined table.
///
/// 1. exact-duplicate rows are dropped from each input independently;
/// 2. epicurious columns are renamed per [`EPICURIOUS_RENAMES`];
/// 3. `title` is normalized in both;
/// 4. rows are inner-joined on `title`, one output row per matching pair, in
///    healthy order then epicurious order;
/// 5. non-key columns present on both sides get `_healthy` / `_epi` suffixes.
///
/// Titles found on only one side are dropped without error.
pub fn reconcile(mut healthy: Table, mut epicurious: Table) -> Result<Table, ReconcileError> {
    let dropped_a = healthy.dedup_rows();
    let dropped_b = epicurious.dedup_rows();
    log::debug!("dropped {dropped_a} duplicate healthy rows, {dropped_b} duplicate epicurious rows");

    epicurious.rename_columns(EPICURIOUS_RENAMES);

    let key_a = healthy.column_index(TITLE).ok_or(ReconcileError::Schema {
        dataset: "healthy",
        column: TITLE,
    })?;
    let key_b = epicurious.column_index(TITLE).ok_or(ReconcileError::Schema {
        dataset: "epicurious",
        column: TITLE,
    })?;

    normalize_title_column(&mut healthy, key_a);
    normalize_title_column(&mut epicurious, key_b);

    let columns = joined_columns(&healthy, key_a, &epicurious, key_b);

    let mut right_rows: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in epicurious.rows.iter().enumerate() {
        if let Some(key) = row[key_b].as_str() {
            right_rows.entry(key).or_default().push(i);
        }
    }

    let mut rows = Vec::new();
    let mut matched_right: HashSet<usize> = HashSet::new();
    let mut unmatched_left = 0usize;
    for left in &healthy.rows {
        let partners = left[key_a].as_str().and_then(|key| right_rows.get(key));
        let Some(partners) = partners else {
            unmatched_left += 1;
            continue;
        };
        for &r in partners {
            matched_right.insert(r);
            let right = &epicurious.rows[r];
            let mut row = Vec::with_capacity(columns.len());
            row.extend(left.iter().cloned());
            row.extend(
                right
                    .iter()
                    .enumerate()
                    .filter(|(c, _)| *c != key_b)
                    .map(|(_, v)| v.clone()),
            );
            rows.push(row);
        }
    }

    log::debug!(
        "join: {} combined rows, {} healthy and {} epicurious rows without a partner",
        rows.len(),
        unmatched_left,
        epicurious.len() - matched_right.len()
    );

    Ok(Table::new(columns, rows))
}

/// Left columns (key in place) followed by right non-key columns, with
/// suffixes on names that appear on both sides.
fn joined_columns(left: &Table, key_left: usize, right: &Table, key_right: usize) -> Vec<String> {
    let left_names: HashSet<&str> = left
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_left)
        .map(|(_, c)| c.as_str())
        .collect();
    let right_names: HashSet<&str> = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_right)
        .map(|(_, c)| c.as_str())
        .collect();

    let left_cols = left.columns.iter().enumerate().map(|(i, c)| {
        if i != key_left && right_names.contains(c.as_str()) {
            format!("{c}{HEALTHY_SUFFIX}")
        } else {
            c.clone()
        }
    });
    let right_cols = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_right)
        .map(|(_, c)| {
            if left_names.contains(c.as_str()) {
                format!("{c}{EPICURIOUS_SUFFIX}")
            } else {
                c.clone()
            }
        });

    left_cols.chain(right_cols).collect()
}
