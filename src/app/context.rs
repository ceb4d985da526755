//! Process-wide components, loaded once at startup.
//!
//! Each component (history, model, scaler) is optional: a failed load is logged and
//! leaves the slot empty, and every request then fails with `ComponentsNotLoaded`
//! instead of the process aborting. The context is immutable after construction and
//! is shared between requests by reference.

use chrono::NaiveDate;

use crate::cli::ComponentArgs;
use crate::domain::{ColumnSet, ForecastResult, ForecastSettings, TimeSeriesTable};
use crate::error::{AppError, ForecastError};
use crate::forecast::{forecast, validate_selection};
use crate::io::{load_history, read_model_json, read_scaler_json};
use crate::math::Scaler;
use crate::models::SequenceModel;

pub struct AppContext {
    columns: ColumnSet,
    settings: ForecastSettings,
    history: Option<TimeSeriesTable>,
    model: Option<Box<dyn SequenceModel>>,
    scaler: Option<Scaler>,
}

/// Which components are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub history: bool,
    pub model: bool,
    pub scaler: bool,
}

impl Readiness {
    pub fn all(&self) -> bool {
        self.history && self.model && self.scaler
    }
}

impl AppContext {
    pub fn new(
        columns: ColumnSet,
        settings: ForecastSettings,
        history: Option<TimeSeriesTable>,
        model: Option<Box<dyn SequenceModel>>,
        scaler: Option<Scaler>,
    ) -> Self {
        Self {
            columns,
            settings,
            history,
            model,
            scaler,
        }
    }

    /// Load every component named by `args`.
    ///
    /// Only configuration errors (bad column list, zero look-back) are returned;
    /// component load failures degrade to an empty slot.
    pub fn load(args: &ComponentArgs) -> Result<Self, AppError> {
        let columns = match &args.columns {
            Some(raw) => ColumnSet::parse_list(raw).map_err(|e| AppError::new(2, format!("--columns: {e}")))?,
            None => ColumnSet::default(),
        };
        if args.look_back == 0 {
            return Err(AppError::new(2, "--look-back must be > 0."));
        }
        let settings = ForecastSettings {
            look_back: args.look_back,
            forecast_decimals: args.forecast_decimals,
            max_horizon_days: args.max_horizon_days,
        };

        let model = match read_model_json(&args.model, &columns, args.look_back) {
            Ok(model) => {
                tracing::info!(path = %args.model.display(), "model loaded");
                Some(Box::new(model) as Box<dyn SequenceModel>)
            }
            Err(err) => {
                tracing::error!(path = %args.model.display(), error = %err, "failed to load model");
                None
            }
        };

        let scaler = match read_scaler_json(&args.scaler, &columns) {
            Ok(scaler) => {
                tracing::info!(path = %args.scaler.display(), "scaler loaded");
                Some(scaler)
            }
            Err(err) => {
                tracing::error!(path = %args.scaler.display(), error = %err, "failed to load scaler");
                None
            }
        };

        let history = match load_history(&args.data, &columns) {
            Ok(ingest) => {
                for row_err in &ingest.row_errors {
                    tracing::warn!(line = row_err.line, "skipped history row: {}", row_err.message);
                }
                tracing::info!(
                    path = %args.data.display(),
                    rows = ingest.rows_used,
                    skipped = ingest.row_errors.len(),
                    end = ?ingest.table.end_date(),
                    "historical data loaded"
                );
                Some(ingest.table)
            }
            Err(err) => {
                tracing::error!(path = %args.data.display(), error = %err, "failed to load historical data");
                None
            }
        };

        Ok(Self::new(columns, settings, history, model, scaler))
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn history(&self) -> Option<&TimeSeriesTable> {
        self.history.as_ref()
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            history: self.history.is_some(),
            model: self.model.is_some(),
            scaler: self.scaler.is_some(),
        }
    }

    /// Last known date, used as the form default.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.history.as_ref().and_then(TimeSeriesTable::end_date)
    }

    /// Forecast `target` and project the result onto `selected` (empty = all columns).
    pub fn forecast(&self, target: &str, selected: &[String]) -> Result<ForecastResult, ForecastError> {
        if !self.readiness().all() {
            return Err(ForecastError::ComponentsNotLoaded);
        }
        validate_selection(selected, &self.columns)?;

        let result = forecast(
            self.history.as_ref(),
            target,
            self.model.as_deref(),
            self.scaler.as_ref(),
            &self.settings,
        )?;
        result.project(selected)
    }
}
