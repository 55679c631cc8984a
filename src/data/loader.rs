use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-delimited with a header row
/// * `.tsv` / `.tab`  – tab-delimited with a header row
/// * `.json`          – `[{ "title": ..., "calories": ..., ... }, ...]`
/// * `.parquet`       – flat columns of strings, ints, floats, bools, dates
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" | "tab" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited-text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line. Every record must have
/// as many fields as the header; ragged files are rejected.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("file has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Type a text cell the way a dataframe reader would: empty → null,
/// then integer, float, boolean, and finally plain text.
pub fn guess_cell_type(s: &str) -> CellValue {
    let t = s.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("null") {
        return CellValue::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return CellValue::Float(f);
    }
    match t {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "Lentil Soup", "calories": 320, "rating": 4.375 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys, each record contributing its new keys in
/// key order; missing keys are null.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sparse: Vec<Vec<(usize, CellValue)>> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = Vec::with_capacity(obj.len());
        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                columns.push(key.clone());
                columns.len() - 1
            });
            cells.push((col, json_to_cell(val)));
        }
        sparse.push(cells);
    }

    let width = columns.len();
    let rows = sparse
        .into_iter()
        .map(|cells| {
            let mut row = vec![CellValue::Null; width];
            for (col, value) in cells {
                row[col] = value;
            }
            row
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat (non-nested) columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested or unsupported column types are
/// rejected rather than stringified.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&columns)
                .map(|(col, name)| {
                    extract_cell(col, row).with_context(|| format!("Row {row}, column '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(Table::new(columns, rows))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => match downcast::<Date32Array>(col)?.value_as_date(row) {
            Some(d) => CellValue::Date(d.format("%Y-%m-%d").to_string()),
            None => CellValue::Null,
        },
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

fn downcast<T: Array + 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("column data does not match type {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_guessed_types() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "a.csv",
            "title,calories,rating,vegan\nLentil Soup,320,4.375,true\n\"Pie, Apple\",,3.5,false\n",
        );
        let t = load_file(&path).unwrap();
        assert_eq!(t.columns, vec!["title", "calories", "rating", "vegan"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0][1], CellValue::Integer(320));
        assert_eq!(t.rows[0][2], CellValue::Float(4.375));
        assert_eq!(t.rows[0][3], CellValue::Bool(true));
        assert_eq!(t.rows[1][0], CellValue::String("Pie, Apple".into()));
        assert_eq!(t.rows[1][1], CellValue::Null);
    }

    #[test]
    fn loads_tab_delimited() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.tsv", "title\tfat\nstew\t12\n");
        let t = load_file(&path).unwrap();
        assert_eq!(t.columns, vec!["title", "fat"]);
        assert_eq!(t.rows[0][1], CellValue::Integer(12));
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.csv", "a,b\n1,2\n3\n");
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn loads_json_records_with_union_of_keys() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "b.json",
            r#"[{"Recipe_name": "Stew", "Fat(g)": 12.5}, {"Recipe_name": "Soup", "Cuisine_type": "french"}]"#,
        );
        let t = load_file(&path).unwrap();
        assert_eq!(t.columns, vec!["Fat(g)", "Recipe_name", "Cuisine_type"]);
        assert_eq!(t.rows[0][0], CellValue::Float(12.5));
        assert_eq!(t.rows[0][2], CellValue::Null);
        assert_eq!(t.rows[1][0], CellValue::Null);
        assert_eq!(t.rows[1][1], CellValue::String("Soup".into()));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "b.json", r#"{"title": "x"}"#);
        assert!(load_file(&path).is_err());
        let path = write(&dir, "c.json", r#"[1, 2]"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn loads_flat_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("calories", DataType::Int64, true),
            Field::new("rating", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["soup", "stew"])),
                Arc::new(Int64Array::from(vec![Some(200), None])),
                Arc::new(Float64Array::from(vec![4.0, 3.5])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load_file(&path).unwrap();
        assert_eq!(t.columns, vec!["title", "calories", "rating"]);
        assert_eq!(t.rows[0][1], CellValue::Integer(200));
        assert_eq!(t.rows[1][1], CellValue::Null);
        assert_eq!(t.rows[1][2], CellValue::Float(3.5));
    }

    #[test]
    fn guesses_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("NaN"), CellValue::Null);
        assert_eq!(guess_cell_type("-7"), CellValue::Integer(-7));
        assert_eq!(guess_cell_type("1e3"), CellValue::Float(1000.0));
        assert_eq!(guess_cell_type("False"), CellValue::Bool(false));
        assert_eq!(guess_cell_type(" Stew "), CellValue::String(" Stew ".into()));
    }
}
