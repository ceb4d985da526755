//! Historical lookup and autoregressive rollout.
//!
//! Given a target date `D` and the last known date `E`:
//!
//! - `D <= E`: return the stored row for `D` (or nothing), seasonally adjusted
//! - `D > E`: feed the last `K` normalized rows to the model, append each prediction
//!   to a private copy of the table, slide the window, repeat `(D - E)` times
//!
//! The shared baseline table is never mutated.

use chrono::NaiveDate;

use crate::domain::{DailyRow, ForecastKind, ForecastResult, ForecastSettings, TimeSeriesTable};
use crate::error::ForecastError;
use crate::forecast::seasonal::{AdjustMode, adjust};
use crate::math::Scaler;
use crate::models::{NormalizedWindow, SequenceModel};

/// Decimal places used for historical lookups.
pub const HISTORY_DECIMALS: usize = 2;

/// Parse a user-supplied target date (`YYYY-MM-DD`).
pub fn parse_target_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ForecastError::InvalidDateFormat)
}

/// Answer "what are the values on `target`" from possibly-missing components.
///
/// Component presence is checked before the date is even parsed.
pub fn forecast(
    table: Option<&TimeSeriesTable>,
    target: &str,
    model: Option<&dyn SequenceModel>,
    scaler: Option<&Scaler>,
    settings: &ForecastSettings,
) -> Result<ForecastResult, ForecastError> {
    let (Some(table), Some(model), Some(scaler)) = (table, model, scaler) else {
        return Err(ForecastError::ComponentsNotLoaded);
    };
    let target = parse_target_date(target)?;
    Forecaster::new(table, model, scaler, settings)?.forecast(target)
}

/// Orchestrates table, scaler and model for one request.
pub struct Forecaster<'a> {
    table: &'a TimeSeriesTable,
    model: &'a dyn SequenceModel,
    scaler: &'a Scaler,
    settings: &'a ForecastSettings,
}

impl<'a> Forecaster<'a> {
    /// Bind components, checking that they agree on column order and window length.
    pub fn new(
        table: &'a TimeSeriesTable,
        model: &'a dyn SequenceModel,
        scaler: &'a Scaler,
        settings: &'a ForecastSettings,
    ) -> Result<Self, ForecastError> {
        let columns = table.columns();
        if scaler.columns() != columns {
            return Err(ForecastError::ShapeMismatch(format!(
                "scaler columns [{}] differ from history columns [{columns}]",
                scaler.columns()
            )));
        }
        if model.columns() != columns {
            return Err(ForecastError::ShapeMismatch(format!(
                "model columns [{}] differ from history columns [{columns}]",
                model.columns()
            )));
        }
        if model.look_back() != settings.look_back {
            return Err(ForecastError::ShapeMismatch(format!(
                "model look-back {} differs from configured {}",
                model.look_back(),
                settings.look_back
            )));
        }
        Ok(Self {
            table,
            model,
            scaler,
            settings,
        })
    }

    pub fn forecast(&self, target: NaiveDate) -> Result<ForecastResult, ForecastError> {
        let end = self.table.end_date().ok_or(ForecastError::InsufficientHistory {
            needed: self.settings.look_back,
            available: 0,
        })?;

        if target <= end {
            Ok(self.lookup(target, end))
        } else {
            self.rollout(target, end)
        }
    }

    fn lookup(&self, target: NaiveDate, end: NaiveDate) -> ForecastResult {
        let columns = self.table.columns();
        let rows: Vec<DailyRow> = self
            .table
            .row_on(target)
            .map(|row| DailyRow {
                date: row.date,
                values: adjust(&row.values, target, end, columns, AdjustMode::Historical),
            })
            .into_iter()
            .collect();

        tracing::debug!(%target, found = !rows.is_empty(), "historical lookup");

        ForecastResult {
            kind: ForecastKind::History,
            columns: columns.clone(),
            decimals: HISTORY_DECIMALS,
            rows,
            trajectory: Vec::new(),
            steps: 0,
        }
    }

    fn rollout(&self, target: NaiveDate, end: NaiveDate) -> Result<ForecastResult, ForecastError> {
        let horizon = (target - end).num_days();
        if let Some(max) = self.settings.max_horizon_days {
            if horizon > i64::from(max) {
                return Err(ForecastError::HorizonTooFar { requested: horizon, max });
            }
        }

        let k = self.settings.look_back;
        let tail = self.table.tail(k);
        if tail.len() < k {
            return Err(ForecastError::InsufficientHistory {
                needed: k,
                available: tail.len(),
            });
        }

        let scaled = tail
            .iter()
            .map(|row| self.scaler.transform(&row.values))
            .collect::<Result<Vec<_>, _>>()?;
        let mut window = NormalizedWindow::new(scaled)?;

        let mut extended = self.table.clone();
        let mut current = end;
        let mut steps = 0usize;

        while current < target {
            let predicted = self.model.predict(&window)?;
            let raw = self.scaler.inverse_transform(&predicted)?;
            let next = next_day(current)?;

            extended.append(DailyRow { date: next, values: raw })?;
            window.push(predicted)?;
            current = next;
            steps += 1;
        }

        let last = extended
            .row_on(target)
            .ok_or_else(|| ForecastError::Inference(format!("rollout stopped before {target}")))?;
        let columns = self.table.columns();
        let adjusted = adjust(&last.values, target, end, columns, AdjustMode::Future);

        tracing::debug!(%target, %end, steps, "rollout forecast");

        Ok(ForecastResult {
            kind: ForecastKind::Forecast,
            columns: columns.clone(),
            decimals: self.settings.forecast_decimals,
            rows: vec![DailyRow {
                date: target,
                values: adjusted,
            }],
            trajectory: extended.rows()[self.table.len()..].to_vec(),
            steps,
        })
    }
}

/// The calendar day after `date`.
///
/// Only fails at the end of chrono's date range, which a parsed target can never
/// lie beyond.
fn next_day(date: NaiveDate) -> Result<NaiveDate, ForecastError> {
    date.succ_opt()
        .ok_or_else(|| ForecastError::Inference(format!("no calendar day after {date}")))
}
