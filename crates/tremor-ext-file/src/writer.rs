//! Impact table writers.
//!
//! Undefined numbers are written as `NaN` in CSV and `null` in JSON. A file
//! is first written to a hidden sibling and renamed into place once the
//! whole table has been serialized, so a failed run never leaves a partial
//! table behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use tremor_analytics::ImpactRow;
use tremor_core::{TremorError, TremorResult};

use crate::csv_error;

/// Marker for undefined numbers in CSV output.
pub const CSV_UNDEFINED: &str = "NaN";

/// CSV column order.
pub const CSV_COLUMNS: [&str; 13] = [
    "event_name",
    "country",
    "event_date_raw",
    "event_date_trading",
    "t_minus_1",
    "t_plus_1",
    "ticker",
    "same_day_return",
    "next_day_return",
    "two_day_return",
    "same_day_z",
    "next_day_z",
    "curve_label",
];

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values, one row per impact row.
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

impl TableFormat {
    /// Picks the format from a file extension (`.json`, otherwise CSV).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// One impact row flattened for CSV, fields in [`CSV_COLUMNS`] order.
#[derive(Serialize)]
struct CsvImpactRecord<'a> {
    event_name: &'a str,
    country: &'a str,
    event_date_raw: String,
    event_date_trading: String,
    t_minus_1: String,
    t_plus_1: String,
    ticker: &'a str,
    same_day_return: String,
    next_day_return: String,
    two_day_return: String,
    same_day_z: String,
    next_day_z: String,
    curve_label: &'static str,
}

impl<'a> From<&'a ImpactRow> for CsvImpactRecord<'a> {
    fn from(row: &'a ImpactRow) -> Self {
        Self {
            event_name: &row.event_name,
            country: &row.country,
            event_date_raw: row.event_date_raw.to_string(),
            event_date_trading: row.event_date_trading.to_string(),
            t_minus_1: row.t_minus_1.to_string(),
            t_plus_1: row.t_plus_1.to_string(),
            ticker: &row.ticker,
            same_day_return: csv_number(row.same_day_return),
            next_day_return: csv_number(row.next_day_return),
            two_day_return: csv_number(row.two_day_return),
            same_day_z: csv_number(row.same_day_z),
            next_day_z: csv_number(row.next_day_z),
            curve_label: row.curve_label.map_or("", |l| l.as_str()),
        }
    }
}

fn csv_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => CSV_UNDEFINED.to_string(),
    }
}

/// Serializes impact tables.
#[derive(Debug, Clone, Copy)]
pub struct ImpactWriter {
    format: TableFormat,
}

impl ImpactWriter {
    /// Creates a writer for a format.
    #[must_use]
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    /// The output format.
    #[must_use]
    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Serializes the table to bytes.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::Io` if serialization fails.
    pub fn to_bytes(&self, rows: &[ImpactRow]) -> TremorResult<Vec<u8>> {
        match self.format {
            TableFormat::Json => {
                let mut bytes = serde_json::to_vec_pretty(rows).map_err(|e| TremorError::io("<json>", e))?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            TableFormat::Csv => {
                // header written explicitly so an empty table still has one
                let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
                csv.write_record(CSV_COLUMNS).map_err(|e| csv_error("<csv>", &e))?;
                for row in rows {
                    csv.serialize(CsvImpactRecord::from(row))
                        .map_err(|e| csv_error("<csv>", &e))?;
                }
                csv.into_inner().map_err(|e| TremorError::io("<csv>", e.error()))
            }
        }
    }

    /// Writes the table to any writer.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::Io` if serialization or the write fails.
    pub fn write_to<W: Write>(&self, rows: &[ImpactRow], mut out: W) -> TremorResult<()> {
        let bytes = self.to_bytes(rows)?;
        out.write_all(&bytes).map_err(|e| TremorError::io("<output>", e))?;
        out.flush().map_err(|e| TremorError::io("<output>", e))
    }

    /// Writes the table to a file, replacing it only after a full write.
    ///
    /// # Errors
    ///
    /// Returns `TremorError::Io` if serialization, the write or the rename
    /// fails. The target is left untouched on error.
    pub fn write_file(&self, rows: &[ImpactRow], path: impl AsRef<Path>) -> TremorResult<()> {
        let path = path.as_ref();
        let target = path.display().to_string();
        let bytes = self.to_bytes(rows)?;

        let staging = staging_path(path);
        if let Err(e) = std::fs::write(&staging, &bytes) {
            let _ = std::fs::remove_file(&staging);
            return Err(TremorError::io(staging.display().to_string(), e));
        }
        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(TremorError::io(target, e));
        }

        info!(path = %target, rows = rows.len(), "wrote impact table");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "impacts".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_core::{CurveLabel, Date};

    fn row(same: Option<f64>) -> ImpactRow {
        let d = |s: &str| Date::parse(s).unwrap();
        ImpactRow {
            event_name: "CPI".into(),
            country: "US".into(),
            event_date_raw: d("2024-01-06"),
            event_date_trading: d("2024-01-08"),
            t_minus_1: d("2024-01-05"),
            t_plus_1: d("2024-01-09"),
            ticker: "TLT".into(),
            same_day_return: same,
            next_day_return: Some(-0.5),
            two_day_return: None,
            same_day_z: None,
            next_day_z: Some(1.25),
            curve_label: Some(CurveLabel::BearFlattening),
        }
    }

    #[test]
    fn test_csv_marks_undefined() {
        let text = String::from_utf8(ImpactWriter::new(TableFormat::Csv).to_bytes(&[row(None)]).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "event_name,country,event_date_raw,event_date_trading,t_minus_1,t_plus_1,ticker,\
             same_day_return,next_day_return,two_day_return,same_day_z,next_day_z,curve_label"
        );
        assert_eq!(
            lines.next().unwrap(),
            "CPI,US,2024-01-06,2024-01-08,2024-01-05,2024-01-09,TLT,NaN,-0.5,NaN,NaN,1.25,bear_flattening"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let text = String::from_utf8(ImpactWriter::new(TableFormat::Csv).to_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), CSV_COLUMNS.join(","));
    }

    #[test]
    fn test_json_marks_undefined() {
        let bytes = ImpactWriter::new(TableFormat::Json).to_bytes(&[row(Some(0.25))]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["same_day_return"], 0.25);
        assert!(value[0]["two_day_return"].is_null());
        assert_eq!(value[0]["curve_label"], "bear_flattening");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("out/impacts.JSON")), TableFormat::Json);
        assert_eq!(TableFormat::from_path(Path::new("impacts.csv")), TableFormat::Csv);
        assert_eq!(staging_path(Path::new("out/impacts.csv")), PathBuf::from("out/.impacts.csv.tmp"));
    }

    #[test]
    fn test_write_file_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("impacts.csv");
        std::fs::write(&target, "stale").unwrap();

        ImpactWriter::new(TableFormat::Csv).write_file(&[row(Some(0.25))], &target).unwrap();
        let text = std::fs::read_to_string(&target).unwrap();
        assert!(text.starts_with("event_name,"));
        assert!(!staging_path(&target).exists());
    }

    #[test]
    fn test_failed_staging_write_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // staging path occupied by a directory, so the staging write fails
        let target = dir.path().join("impacts.csv");
        std::fs::create_dir(staging_path(&target)).unwrap();

        let err = ImpactWriter::new(TableFormat::Csv).write_file(&[row(None)], &target).unwrap_err();
        assert!(matches!(err, TremorError::Io { .. }));
        assert!(!target.exists());
    }
}
