use thiserror::Error;

/// Application-level error carrying the process exit code.
///
/// Exit codes:
/// - 2: bad input (arguments, artifact files, CSV schema)
/// - 3: unusable data (no rows, not enough history)
/// - 4: runtime failure (model inference, server I/O)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of a single forecast request.
///
/// The `Display` strings of the first two variants are shown to end users verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Model, scaler, or historical data not loaded.")]
    ComponentsNotLoaded,

    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDateFormat,

    #[error("Not enough history for a forecast: need {needed} rows, have {available}.")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("Requested date is {requested} days past the last known date; the limit is {max}.")]
    HorizonTooFar { requested: i64, max: u32 },

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Vector shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid column selection: {0}")]
    InvalidSelection(String),
}

impl ForecastError {
    /// True when the caller sent something unusable (as opposed to a server-side fault).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidDateFormat
                | ForecastError::HorizonTooFar { .. }
                | ForecastError::UnknownColumn(_)
                | ForecastError::InvalidSelection(_)
        )
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        let code = match &err {
            ForecastError::InvalidDateFormat
            | ForecastError::HorizonTooFar { .. }
            | ForecastError::UnknownColumn(_)
            | ForecastError::InvalidSelection(_)
            | ForecastError::ComponentsNotLoaded => 2,
            ForecastError::InsufficientHistory { .. } => 3,
            ForecastError::Inference(_) | ForecastError::ShapeMismatch(_) => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_are_literal() {
        assert_eq!(
            ForecastError::InvalidDateFormat.to_string(),
            "Invalid date format. Please use YYYY-MM-DD."
        );
        assert_eq!(
            ForecastError::ComponentsNotLoaded.to_string(),
            "Model, scaler, or historical data not loaded."
        );
    }

    #[test]
    fn forecast_error_maps_to_exit_code() {
        let err: AppError = ForecastError::Inference("boom".to_string()).into();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("boom"));

        let err: AppError = ForecastError::InsufficientHistory { needed: 7, available: 3 }.into();
        assert_eq!(err.exit_code(), 3);
    }
}
