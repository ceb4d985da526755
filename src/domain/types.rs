//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - loaded once at startup and shared read-only between requests
//! - copied cheaply into a per-request rollout
//! - projected and formatted for terminal, HTML and JSON output

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Commodities tracked by the bundled model, in training order.
pub const DEFAULT_COLUMNS: [&str; 5] = ["Rice", "Wheat", "Atta (Wheat)", "Gram Dal", "Tur/Arhar Dal"];

/// Look-back window length the bundled model was trained with.
pub const DEFAULT_LOOK_BACK: usize = 7;

/// Ordered list of tracked column names.
///
/// The order defines the component order of every vector handed to the scaler and
/// the model, so it is threaded through explicitly rather than re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    pub fn new<I, S>(names: I) -> Result<Self, ForecastError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(|s| s.into().trim().to_string()).collect();
        if names.is_empty() {
            return Err(ForecastError::InvalidSelection("column set is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if name.is_empty() {
                return Err(ForecastError::InvalidSelection("blank column name".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ForecastError::InvalidSelection(format!("duplicate column `{name}`")));
            }
        }
        Ok(Self(names))
    }

    /// Parse a comma-separated list (`"Rice, Wheat"`).
    pub fn parse_list(raw: &str) -> Result<Self, ForecastError> {
        Self::new(raw.split(',').filter(|s| !s.trim().is_empty()))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self(DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for ColumnSet {
    type Error = ForecastError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnSet> for Vec<String> {
    fn from(value: ColumnSet) -> Self {
        value.0
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// One day of values, ordered like the owning `ColumnSet`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

/// Date-ordered daily table.
///
/// Invariants: every row has one value per column, dates strictly increase.
#[derive(Debug, Clone)]
pub struct TimeSeriesTable {
    columns: ColumnSet,
    rows: Vec<DailyRow>,
}

impl TimeSeriesTable {
    /// Build a table from rows in any order; rows are sorted by date.
    pub fn new(columns: ColumnSet, mut rows: Vec<DailyRow>) -> Result<Self, ForecastError> {
        for row in &rows {
            if row.values.len() != columns.len() {
                return Err(ForecastError::ShapeMismatch(format!(
                    "row {} has {} values, expected {}",
                    row.date,
                    row.values.len(),
                    columns.len()
                )));
            }
        }
        rows.sort_by_key(|r| r.date);
        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ForecastError::ShapeMismatch(format!("duplicate date {}", pair[0].date)));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[DailyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    /// Latest date in the table.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn row_on(&self, date: NaiveDate) -> Option<&DailyRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// The last `k` rows (fewer if the table is shorter).
    pub fn tail(&self, k: usize) -> &[DailyRow] {
        let start = self.rows.len().saturating_sub(k);
        &self.rows[start..]
    }

    /// Append a row dated after the current end.
    pub fn append(&mut self, row: DailyRow) -> Result<(), ForecastError> {
        if row.values.len() != self.columns.len() {
            return Err(ForecastError::ShapeMismatch(format!(
                "appended row has {} values, expected {}",
                row.values.len(),
                self.columns.len()
            )));
        }
        if let Some(end) = self.end_date() {
            if row.date <= end {
                return Err(ForecastError::ShapeMismatch(format!(
                    "appended row {} is not after {end}",
                    row.date
                )));
            }
        }
        self.rows.push(row);
        Ok(())
    }
}

/// Which branch produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    /// Direct lookup of a known date.
    History,
    /// Autoregressive rollout past the last known date.
    Forecast,
}

/// Outcome of one forecast request, before formatting.
#[derive(Debug, Clone)]
pub struct ForecastResult {
    pub kind: ForecastKind,
    pub columns: ColumnSet,
    /// Decimal places used when the values are rendered.
    pub decimals: usize,
    /// Seasonally adjusted result rows (zero or one).
    pub rows: Vec<DailyRow>,
    /// Raw daily predictions appended during the rollout, oldest first.
    pub trajectory: Vec<DailyRow>,
    /// Number of model inference calls performed.
    pub steps: usize,
}

impl ForecastResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only `selected` columns, in the order given.
    ///
    /// An empty selection keeps every column.
    pub fn project(&self, selected: &[String]) -> Result<ForecastResult, ForecastError> {
        if selected.is_empty() {
            return Ok(self.clone());
        }

        let mut indices = Vec::with_capacity(selected.len());
        for name in selected {
            let idx = self
                .columns
                .index_of(name)
                .ok_or_else(|| ForecastError::UnknownColumn(name.clone()))?;
            indices.push(idx);
        }
        let columns = ColumnSet::new(selected.iter().cloned())?;

        let pick = |row: &DailyRow| DailyRow {
            date: row.date,
            values: indices.iter().map(|&i| row.values[i]).collect(),
        };

        Ok(ForecastResult {
            kind: self.kind,
            columns,
            decimals: self.decimals,
            rows: self.rows.iter().map(pick).collect(),
            trajectory: self.trajectory.iter().map(pick).collect(),
            steps: self.steps,
        })
    }
}

/// Tunables for the forecaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSettings {
    /// Window length `K` fed to the model.
    pub look_back: usize,
    /// Decimal places for rollout output (lookups always use 2).
    pub forecast_decimals: usize,
    /// Reject targets further than this many days past the last known date.
    pub max_horizon_days: Option<u32>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            look_back: DEFAULT_LOOK_BACK,
            forecast_decimals: 4,
            max_horizon_days: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn two_cols() -> ColumnSet {
        ColumnSet::new(["A", "B"]).unwrap()
    }

    #[test]
    fn column_set_rejects_duplicates_and_blanks() {
        assert!(ColumnSet::new(["Rice", "Rice"]).is_err());
        assert!(ColumnSet::new(["Rice", " "]).is_err());
        assert!(ColumnSet::new(Vec::<String>::new()).is_err());

        let parsed = ColumnSet::parse_list("Rice, Atta (Wheat) ,Gram Dal").unwrap();
        assert_eq!(parsed.names(), ["Rice", "Atta (Wheat)", "Gram Dal"]);
        assert_eq!(ColumnSet::default().len(), 5);
    }

    #[test]
    fn table_sorts_rows_and_rejects_duplicate_dates() {
        let rows = vec![
            DailyRow { date: d(2024, 1, 2), values: vec![2.0, 2.0] },
            DailyRow { date: d(2024, 1, 1), values: vec![1.0, 1.0] },
        ];
        let table = TimeSeriesTable::new(two_cols(), rows).unwrap();
        assert_eq!(table.first_date(), Some(d(2024, 1, 1)));
        assert_eq!(table.end_date(), Some(d(2024, 1, 2)));
        assert_eq!(table.row_on(d(2024, 1, 1)).unwrap().values, vec![1.0, 1.0]);
        assert!(table.row_on(d(2024, 1, 3)).is_none());

        let dup = vec![
            DailyRow { date: d(2024, 1, 1), values: vec![1.0, 1.0] },
            DailyRow { date: d(2024, 1, 1), values: vec![2.0, 2.0] },
        ];
        assert!(TimeSeriesTable::new(two_cols(), dup).is_err());
    }

    #[test]
    fn append_only_accepts_later_dates() {
        let rows = vec![DailyRow { date: d(2024, 1, 5), values: vec![1.0, 1.0] }];
        let mut table = TimeSeriesTable::new(two_cols(), rows).unwrap();

        assert!(table.append(DailyRow { date: d(2024, 1, 5), values: vec![1.0, 1.0] }).is_err());
        assert!(table.append(DailyRow { date: d(2024, 1, 6), values: vec![1.0] }).is_err());
        table.append(DailyRow { date: d(2024, 1, 6), values: vec![3.0, 4.0] }).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.tail(5).len(), 2);
        assert_eq!(table.tail(1)[0].date, d(2024, 1, 6));
    }

    #[test]
    fn projection_reorders_and_validates_columns() {
        let result = ForecastResult {
            kind: ForecastKind::Forecast,
            columns: ColumnSet::new(["A", "B", "C"]).unwrap(),
            decimals: 4,
            rows: vec![DailyRow { date: d(2024, 1, 1), values: vec![1.0, 2.0, 3.0] }],
            trajectory: vec![DailyRow { date: d(2024, 1, 1), values: vec![1.0, 2.0, 3.0] }],
            steps: 1,
        };

        let projected = result.project(&["C".to_string(), "A".to_string()]).unwrap();
        assert_eq!(projected.columns.names(), ["C", "A"]);
        assert_eq!(projected.rows[0].values, vec![3.0, 1.0]);
        assert_eq!(projected.trajectory[0].values, vec![3.0, 1.0]);

        assert_eq!(result.project(&[]).unwrap().columns.len(), 3);
        assert_eq!(
            result.project(&["Z".to_string()]).unwrap_err(),
            ForecastError::UnknownColumn("Z".to_string())
        );
    }
}
