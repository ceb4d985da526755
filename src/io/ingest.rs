//! CSV ingest of daily history.
//!
//! Turns a wide CSV (`Date` plus one numeric column per commodity) into a
//! `TimeSeriesTable` ordered like the configured `ColumnSet`.
//!
//! Design goals:
//! - **Strict schema** for the tracked columns (missing column = hard error)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (rows sorted by date, duplicates rejected)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{ColumnSet, DailyRow, TimeSeriesTable};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus bookkeeping about skipped rows.
#[derive(Debug, Clone)]
pub struct IngestedHistory {
    pub table: TimeSeriesTable,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a history CSV from disk.
pub fn load_history(path: &Path, columns: &ColumnSet) -> Result<IngestedHistory, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open history CSV '{}': {e}", path.display())))?;
    read_history(file, columns)
}

/// Parse history from any reader.
pub fn read_history<R: Read>(input: R, columns: &ColumnSet) -> Result<IngestedHistory, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = *header_map
        .get("date")
        .ok_or_else(|| AppError::new(2, "Missing required column: `Date`"))?;
    let value_idx = columns
        .iter()
        .map(|name| {
            header_map
                .get(&normalize_header_name(name))
                .copied()
                .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, date_idx, &value_idx, columns) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = rows.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows in history CSV."));
    }

    let table = TimeSeriesTable::new(columns.clone(), rows)
        .map_err(|e| AppError::new(3, format!("Invalid history: {e}")))?;

    Ok(IngestedHistory {
        table,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn parse_row(
    record: &StringRecord,
    date_idx: usize,
    value_idx: &[usize],
    columns: &ColumnSet,
) -> Result<DailyRow, String> {
    let raw_date = record
        .get(date_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing `Date` value.".to_string())?;
    let date = parse_date(raw_date)?;

    let mut values = Vec::with_capacity(value_idx.len());
    for (&idx, name) in value_idx.iter().zip(columns.iter()) {
        let value = parse_opt_f64(record.get(idx))
            .ok_or_else(|| format!("Missing/invalid `{name}` value on {date}."))?;
        values.push(value);
    }

    Ok(DailyRow { date, values })
}

/// Parse a history date in one of the accepted layouts.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // Timestamps such as `2024-01-10 00:00:00` keep only the date part.
    if let Some((head, _)) = s.split_once([' ', 'T']) {
        if let Ok(d) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> ColumnSet {
        ColumnSet::new(["Rice", "Wheat"]).unwrap()
    }

    #[test]
    fn reads_wide_csv_in_column_order() {
        let csv = "\u{feff}Date,Wheat,Other,Rice\n2024-01-02,30,x,41.5\n2024-01-01,29,y,40\n";
        let ingest = read_history(csv.as_bytes(), &cols()).unwrap();

        assert_eq!(ingest.rows_read, 2);
        assert_eq!(ingest.rows_used, 2);
        let rows = ingest.table.rows();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].values, vec![40.0, 29.0]);
        assert_eq!(rows[1].values, vec![41.5, 30.0]);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "Date,Rice,Wheat\n2024-01-01,40,29\nnot-a-date,1,1\n2024-01-03,,29\n2024-01-04,42,NaN\n";
        let ingest = read_history(csv.as_bytes(), &cols()).unwrap();

        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 1);
        assert_eq!(ingest.row_errors.len(), 3);
        assert_eq!(ingest.row_errors[0].line, 3);
    }

    #[test]
    fn missing_tracked_column_is_fatal() {
        let csv = "Date,Rice\n2024-01-01,40\n";
        let err = read_history(csv.as_bytes(), &cols()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Wheat"));
    }

    #[test]
    fn duplicate_dates_are_fatal() {
        let csv = "Date,Rice,Wheat\n2024-01-01,40,29\n01/01/2024,41,30\n";
        let err = read_history(csv.as_bytes(), &cols()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn accepts_common_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        for raw in ["2024-03-09", "09/03/2024", "09-03-2024", "2024/03/09", "2024-03-09 00:00:00"] {
            assert_eq!(parse_date(raw).unwrap(), expected, "{raw}");
        }
        assert!(parse_date("March 9").is_err());
    }
}
