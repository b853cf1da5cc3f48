use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord};

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_BOOSTER_CATEGORY,
    COL_CLASS,
];

// ---------------------------------------------------------------------------
// Load results
// ---------------------------------------------------------------------------

/// Why a single row was left out of the dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing launch site")]
    MissingSite,
    #[error("missing booster version category")]
    MissingBooster,
    #[error("missing payload mass")]
    MissingPayload,
    #[error("payload mass '{0}' is not a number")]
    InvalidPayload(String),
    #[error("payload mass {0} is negative or not finite")]
    PayloadOutOfRange(f64),
    #[error("missing class")]
    MissingClass,
    #[error("class '{0}' is not 0 or 1")]
    InvalidClass(String),
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A rejected row: data row number (1-based, header excluded) plus the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: RecordError,
}

/// Outcome of a successful load.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: LaunchDataset,
    pub skipped: Vec<SkippedRow>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load launch records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row containing at least the four launch columns
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
///
/// Rows that fail validation are skipped and listed in the report. A missing
/// column or a file without a single valid row is an error.
pub fn load_file(path: &Path) -> Result<LoadReport> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut rows = RowCollector::default();
    match ext.as_str() {
        "csv" => load_csv(path, &mut rows)?,
        "json" => load_json(path, &mut rows)?,
        "parquet" | "pq" => load_parquet(path, &mut rows)?,
        other => bail!("Unsupported file extension: .{other}"),
    }

    let report = rows.finish();
    if report.dataset.is_empty() {
        bail!(
            "{} contains no valid launch records ({} rows skipped)",
            path.display(),
            report.skipped.len()
        );
    }
    log::info!(
        "Loaded {} launches from {} ({} rows skipped, sites {:?})",
        report.dataset.len(),
        path.display(),
        report.skipped.len(),
        report.dataset.launch_sites
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Row validation shared by every format
// ---------------------------------------------------------------------------

/// A raw cell before validation.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

#[derive(Default)]
struct RowCollector {
    records: Vec<LaunchRecord>,
    skipped: Vec<SkippedRow>,
    next_row: usize,
}

impl RowCollector {
    fn push(&mut self, parsed: std::result::Result<LaunchRecord, RecordError>) {
        self.next_row += 1;
        let row = self.next_row;
        match parsed {
            Ok(rec) => self.records.push(rec),
            Err(reason) => {
                log::warn!("Skipping row {row}: {reason}");
                self.skipped.push(SkippedRow { row, reason });
            }
        }
    }

    fn finish(self) -> LoadReport {
        LoadReport {
            dataset: LaunchDataset::from_records(self.records),
            skipped: self.skipped,
        }
    }
}

fn build_record(
    site: Cell,
    payload: Cell,
    booster: Cell,
    class: Cell,
) -> std::result::Result<LaunchRecord, RecordError> {
    let launch_site = non_empty_text(site).ok_or(RecordError::MissingSite)?;
    let booster_version_category = non_empty_text(booster).ok_or(RecordError::MissingBooster)?;

    let payload_mass_kg = match payload {
        Cell::Number(v) => v,
        Cell::Text(s) if s.trim().is_empty() => return Err(RecordError::MissingPayload),
        Cell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidPayload(s.clone()))?,
        Cell::Missing => return Err(RecordError::MissingPayload),
    };
    if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
        return Err(RecordError::PayloadOutOfRange(payload_mass_kg));
    }

    let outcome_class = match class {
        Cell::Number(v) if v == 0.0 => 0,
        Cell::Number(v) if v == 1.0 => 1,
        Cell::Number(v) => return Err(RecordError::InvalidClass(v.to_string())),
        Cell::Text(s) if s.trim().is_empty() => return Err(RecordError::MissingClass),
        Cell::Text(s) => {
            let parsed = s.trim().parse::<f64>();
            match parsed {
                Ok(v) if v == 0.0 => 0,
                Ok(v) if v == 1.0 => 1,
                _ => return Err(RecordError::InvalidClass(s)),
            }
        }
        Cell::Missing => return Err(RecordError::MissingClass),
    };

    Ok(LaunchRecord {
        launch_site,
        payload_mass_kg,
        booster_version_category,
        outcome_class,
    })
}

fn non_empty_text(cell: Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Cell::Number(v) => Some(v.to_string()),
        Cell::Missing => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns (flight number,
/// booster version, an unnamed pandas index) are ignored.
fn load_csv(path: &Path, rows: &mut RowCollector) -> Result<()> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let [site_idx, payload_idx, booster_idx, class_idx] = REQUIRED_COLUMNS.map(|name| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    });
    let (site_idx, payload_idx, booster_idx, class_idx) =
        (site_idx?, payload_idx?, booster_idx?, class_idx?);

    let text = |record: &csv::StringRecord, idx: usize| match record.get(idx) {
        Some(s) => Cell::Text(s.to_string()),
        None => Cell::Missing,
    };

    for result in reader.records() {
        let parsed = result
            .map_err(|e| RecordError::Malformed(e.to_string()))
            .and_then(|record| {
                build_record(
                    text(&record, site_idx),
                    text(&record, payload_idx),
                    text(&record, booster_idx),
                    text(&record, class_idx),
                )
            });
        rows.push(parsed);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "Booster Version Category": "v1.0",
///     "class": 1
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path, rows: &mut RowCollector) -> Result<()> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    for (i, rec) in records.iter().enumerate() {
        let parsed = match rec.as_object() {
            Some(obj) => {
                let cell = |name: &str| json_to_cell(obj.get(name));
                build_record(
                    cell(COL_LAUNCH_SITE),
                    cell(COL_PAYLOAD_MASS),
                    cell(COL_BOOSTER_CATEGORY),
                    cell(COL_CLASS),
                )
            }
            None => Err(RecordError::Malformed(format!(
                "row {} is not a JSON object",
                i + 1
            ))),
        };
        rows.push(parsed);
    }
    Ok(())
}

fn json_to_cell(val: Option<&JsonValue>) -> Cell {
    match val {
        Some(JsonValue::String(s)) => Cell::Text(s.clone()),
        Some(JsonValue::Number(n)) => n.as_f64().map_or(Cell::Missing, Cell::Number),
        Some(JsonValue::Bool(b)) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Some(JsonValue::Null) | None => Cell::Missing,
        Some(other) => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the launch table.
///
/// Every required column is cast up front: string-like columns (including
/// dictionary-encoded pandas `category` columns) to Utf8, numeric and boolean
/// columns to Float64. Any other type is an error. Works with files written
/// by both **Pandas** and **Polars**.
fn load_parquet(path: &Path, rows: &mut RowCollector) -> Result<()> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let [site, payload, booster, class] = REQUIRED_COLUMNS.map(|name| {
            schema
                .index_of(name)
                .map(|idx| batch.column(idx).clone())
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
                .and_then(|col| normalize_column(name, &col))
        });
        let (site, payload, booster, class) = (site?, payload?, booster?, class?);

        for row in 0..batch.num_rows() {
            rows.push(build_record(
                arrow_cell(&site, row),
                arrow_cell(&payload, row),
                arrow_cell(&booster, row),
                arrow_cell(&class, row),
            ));
        }
    }
    Ok(())
}

fn is_text_type(dt: &DataType) -> bool {
    match dt {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, value) => is_text_type(value),
        _ => false,
    }
}

fn is_number_type(dt: &DataType) -> bool {
    match dt {
        DataType::Boolean => true,
        DataType::Dictionary(_, value) => is_number_type(value),
        other => other.is_numeric(),
    }
}

/// Cast a required column to Utf8 or Float64 so cells can be read uniformly.
fn normalize_column(name: &str, col: &ArrayRef) -> Result<ArrayRef> {
    let dt = col.data_type();
    let target = if is_text_type(dt) {
        DataType::Utf8
    } else if is_number_type(dt) {
        DataType::Float64
    } else {
        bail!("unsupported column type for '{name}': {dt}");
    };
    if *dt == target {
        return Ok(col.clone());
    }
    cast(col.as_ref(), &target)
        .with_context(|| format!("unsupported column type for '{name}': {dt}"))
}

/// Extract a single cell from a normalised (Utf8 or Float64) column.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        // normalize_column only yields the two types above
        _ => Cell::Missing,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        BooleanArray, Date32Array, DictionaryArray, Float64Array, Int32Array, Int64Array,
        StringArray,
    };
    use arrow::datatypes::{Field, Int32Type, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("create temp file");
        let mut writer = ArrowWriter::try_new(file.reopen().expect("reopen"), batch.schema(), None)
            .expect("writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    const CSV_HEADER: &str =
        ",Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category\n";

    #[test]
    fn loads_csv_with_extra_columns() {
        let file = write_temp(
            ".csv",
            &format!(
                "{CSV_HEADER}\
                 0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0\n\
                 1,2,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0\n\
                 2,3,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1\n"
            ),
        );

        let report = load_file(file.path()).expect("load csv");
        assert!(report.skipped.is_empty());
        let ds = report.dataset;
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.launch_sites, vec!["CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(ds.records[1].payload_mass_kg, 525.0);
        assert_eq!(ds.records[2].booster_version_category, "v1.1");
        assert_eq!(ds.records[2].outcome_class, 1);
        assert_eq!(ds.payload_min, 0.0);
        assert_eq!(ds.payload_max, 525.0);
    }

    #[test]
    fn skips_malformed_csv_rows_and_reports_them() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\n\
             KSC LC-39A,2490,FT,1\n\
             KSC LC-39A,heavy,FT,1\n\
             ,3000,FT,0\n\
             KSC LC-39A,-5,FT,0\n\
             KSC LC-39A,4000,FT,2\n\
             KSC LC-39A,4000,,1\n\
             KSC LC-39A,4000\n\
             CCAFS SLC-40,3600,B4,0\n",
        );

        let report = load_file(file.path()).expect("load csv");
        assert_eq!(report.dataset.len(), 2);

        let reasons: Vec<(usize, &RecordError)> =
            report.skipped.iter().map(|s| (s.row, &s.reason)).collect();
        assert_eq!(reasons.len(), 6);
        assert_eq!(reasons[0], (2, &RecordError::InvalidPayload("heavy".into())));
        assert_eq!(reasons[1], (3, &RecordError::MissingSite));
        assert_eq!(reasons[2], (4, &RecordError::PayloadOutOfRange(-5.0)));
        assert_eq!(reasons[3], (5, &RecordError::InvalidClass("2".into())));
        assert_eq!(reasons[4], (6, &RecordError::MissingBooster));
        assert!(matches!(reasons[5], (7, RecordError::Malformed(_))));
    }

    #[test]
    fn missing_column_is_fatal() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class\nKSC LC-39A,2490,1\n",
        );
        let err = load_file(file.path()).expect_err("missing column");
        assert!(err.to_string().contains("Booster Version Category"));
    }

    #[test]
    fn file_without_valid_rows_is_fatal() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\nKSC,x,FT,1\n",
        );
        let err = load_file(file.path()).expect_err("no valid rows");
        assert!(err.to_string().contains("no valid launch records"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).expect_err("unsupported");
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 5300.0,
                 "Booster Version Category": "FT", "class": 1},
                {"Launch Site": "VAFB SLC-4E", "Payload Mass (kg)": "9600",
                 "Booster Version Category": "B4", "class": 0},
                {"Launch Site": "VAFB SLC-4E", "Payload Mass (kg)": null,
                 "Booster Version Category": "B4", "class": 0},
                "not a row"
            ]"#,
        );

        let report = load_file(file.path()).expect("load json");
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.dataset.records[1].payload_mass_kg, 9600.0);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].reason, RecordError::MissingPayload);
        assert!(matches!(report.skipped[1].reason, RecordError::Malformed(_)));
    }

    #[test]
    fn loads_parquet_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, true),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["CCAFS LC-40", "KSC LC-39A", "KSC LC-39A"])),
                Arc::new(Float64Array::from(vec![Some(2296.0), None, Some(6070.0)])),
                Arc::new(StringArray::from(vec!["FT", "FT", "B5"])),
                Arc::new(Int64Array::from(vec![1, 0, 1])),
            ],
        )
        .expect("record batch");

        let file = write_parquet(&batch);
        let report = load_file(file.path()).expect("load parquet");
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row, 2);
        assert_eq!(report.dataset.records[1].booster_version_category, "B5");
        assert_eq!(report.dataset.payload_max, 6070.0);
    }

    #[test]
    fn loads_dictionary_encoded_and_narrow_columns() {
        let sites: DictionaryArray<Int32Type> =
            vec!["CCAFS LC-40", "KSC LC-39A", "CCAFS LC-40"].into_iter().collect();
        let boosters: DictionaryArray<Int32Type> = vec!["v1.1", "FT", "FT"].into_iter().collect();
        let dict = |value: DataType| {
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(value))
        };
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, dict(DataType::Utf8), false),
            Field::new(COL_PAYLOAD_MASS, DataType::Int32, false),
            Field::new(COL_BOOSTER_CATEGORY, dict(DataType::Utf8), false),
            Field::new(COL_CLASS, DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(sites),
                Arc::new(Int32Array::from(vec![500, 3170, 5300])),
                Arc::new(boosters),
                Arc::new(BooleanArray::from(vec![false, true, true])),
            ],
        )
        .expect("record batch");

        let file = write_parquet(&batch);
        let report = load_file(file.path()).expect("load parquet");
        assert!(report.skipped.is_empty());
        let ds = report.dataset;
        assert_eq!(ds.launch_sites, vec!["CCAFS LC-40", "KSC LC-39A"]);
        assert_eq!(ds.booster_categories, vec!["v1.1", "FT"]);
        assert_eq!(ds.records[1].payload_mass_kg, 3170.0);
        assert_eq!(ds.records[0].outcome_class, 0);
        assert_eq!(ds.records[2].outcome_class, 1);
    }

    #[test]
    fn unsupported_parquet_column_type_is_fatal() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Date32, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(vec![19000])),
                Arc::new(Float64Array::from(vec![2500.0])),
                Arc::new(StringArray::from(vec!["FT"])),
                Arc::new(Int64Array::from(vec![1])),
            ],
        )
        .expect("record batch");

        let file = write_parquet(&batch);
        let err = load_file(file.path()).expect_err("date column");
        assert!(err
            .to_string()
            .contains("unsupported column type for 'Launch Site'"));
    }

    #[test]
    fn class_accepts_float_text() {
        let rec = build_record(
            Cell::Text("CCAFS".into()),
            Cell::Text(" 1500.5 ".into()),
            Cell::Text("FT".into()),
            Cell::Text("1.0".into()),
        )
        .expect("valid row");
        assert_eq!(rec.outcome_class, 1);
        assert_eq!(rec.payload_mass_kg, 1500.5);
    }
}
