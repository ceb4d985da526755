//! Human-readable terminal formatting.

use chrono::NaiveDate;

use crate::domain::{DailyRow, ForecastKind, ForecastResult, TimeSeriesTable};

/// Render one value with the result's precision (`12.3456` -> `"12.35"` at 2 places).
pub fn format_value(v: f64, decimals: usize) -> String {
    format!("{v:.decimals$}")
}

/// Render a row's values as strings.
pub fn format_row(row: &DailyRow, decimals: usize) -> Vec<String> {
    row.values.iter().map(|v| format_value(*v, decimals)).collect()
}

/// Format the headline and result table of a forecast.
pub fn format_forecast(result: &ForecastResult, end_date: Option<NaiveDate>) -> String {
    let mut out = String::new();

    let label = match result.kind {
        ForecastKind::History => "historical lookup",
        ForecastKind::Forecast => "rollout forecast",
    };
    out.push_str(&format!("=== cf - {label} ===\n"));
    if let Some(end) = end_date {
        out.push_str(&format!("Last known date: {end}\n"));
    }
    if result.kind == ForecastKind::Forecast {
        out.push_str(&format!("Inference steps: {}\n", result.steps));
    }
    out.push('\n');

    if result.is_empty() {
        out.push_str("No data for the requested date.\n");
        return out;
    }

    out.push_str(&format_table(&result.rows, result));
    out
}

/// Format the day-by-day rollout path.
pub fn format_trajectory(result: &ForecastResult) -> String {
    if result.trajectory.is_empty() {
        return String::new();
    }
    let mut out = String::from("Trajectory (unadjusted):\n");
    out.push_str(&format_table(&result.trajectory, result));
    out
}

/// Format a short description of the loaded history.
pub fn format_history_summary(table: &TimeSeriesTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Columns: {}\n", table.columns()));
    out.push_str(&format!("Rows: {}\n", table.len()));
    if let (Some(first), Some(end)) = (table.first_date(), table.end_date()) {
        out.push_str(&format!("Span: {first} .. {end}\n"));
    }
    out
}

fn format_table(rows: &[DailyRow], result: &ForecastResult) -> String {
    let widths: Vec<usize> = result
        .columns
        .iter()
        .map(|name| name.chars().count().clamp(10, 16))
        .collect();

    let mut out = String::new();
    let mut line = format!("{:<10}", "Date");
    for (name, w) in result.columns.iter().zip(widths.iter().copied()) {
        line.push_str(&format!(" {:>w$}", truncate(name, w)));
    }
    out.push_str(line.trim_end());
    out.push('\n');

    let mut rule = "-".repeat(10);
    for w in &widths {
        rule.push(' ');
        rule.push_str(&"-".repeat(*w));
    }
    out.push_str(&rule);
    out.push('\n');

    for row in rows {
        let mut line = row.date.format("%Y-%m-%d").to_string();
        for (value, w) in format_row(row, result.decimals).iter().zip(widths.iter().copied()) {
            line.push_str(&format!(" {value:>w$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnSet;

    fn result(kind: ForecastKind, decimals: usize) -> ForecastResult {
        ForecastResult {
            kind,
            columns: ColumnSet::new(["Rice", "Tur/Arhar Dal long name"]).unwrap(),
            decimals,
            rows: vec![DailyRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
                values: vec![41.23456, 120.0],
            }],
            trajectory: Vec::new(),
            steps: 3,
        }
    }

    #[test]
    fn values_follow_precision() {
        assert_eq!(format_value(41.23456, 2), "41.23");
        assert_eq!(format_value(41.23456, 4), "41.2346");
        assert_eq!(format_value(0.0, 2), "0.00");
    }

    #[test]
    fn forecast_table_has_header_and_row() {
        let text = format_forecast(&result(ForecastKind::Forecast, 4), None);
        assert!(text.contains("rollout forecast"));
        assert!(text.contains("Inference steps: 3"));
        assert!(text.contains("2024-01-13"));
        assert!(text.contains("41.2346"));
        assert!(text.contains("Tur/Arhar Dal l."));
    }

    #[test]
    fn empty_lookup_says_so() {
        let mut r = result(ForecastKind::History, 2);
        r.rows.clear();
        assert!(format_forecast(&r, None).contains("No data"));
        assert!(format_trajectory(&r).is_empty());
    }
}
