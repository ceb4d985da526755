//! Export forecast rows to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DailyRow, ForecastResult};
use crate::error::AppError;

/// Write the rollout trajectory (or the lookup row when there is no rollout) to CSV.
pub fn write_forecast_csv(path: &Path, result: &ForecastResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_forecast(file, result)
}

pub fn write_forecast<W: Write>(mut out: W, result: &ForecastResult) -> Result<(), AppError> {
    let rows: &[DailyRow] = if result.trajectory.is_empty() {
        &result.rows
    } else {
        &result.trajectory
    };

    let header: Vec<String> = std::iter::once("Date".to_string())
        .chain(result.columns.iter().map(csv_field))
        .collect();
    writeln!(out, "{}", header.join(","))
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let mut line = row.date.format("%Y-%m-%d").to_string();
        for v in &row.values {
            line.push_str(&format!(",{v:.prec$}", prec = result.decimals));
        }
        writeln!(out, "{line}").map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn csv_field(name: &str) -> String {
    if name.contains([',', '"', '\n']) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{ColumnSet, ForecastKind};

    #[test]
    fn writes_trajectory_rows() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let result = ForecastResult {
            kind: ForecastKind::Forecast,
            columns: ColumnSet::new(["Rice", "Tur, Arhar"]).unwrap(),
            decimals: 4,
            rows: vec![DailyRow { date: d(12), values: vec![1.0, 2.0] }],
            trajectory: vec![
                DailyRow { date: d(11), values: vec![1.0, 2.0] },
                DailyRow { date: d(12), values: vec![1.5, 2.5] },
            ],
            steps: 2,
        };

        let mut buf = Vec::new();
        write_forecast(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Date,Rice,\"Tur, Arhar\"\n2024-01-11,1.0000,2.0000\n2024-01-12,1.5000,2.5000\n"
        );
    }
}
