//! Read model and scaler JSON artifacts.
//!
//! Both artifacts carry the column list they were fitted with. Loading checks it
//! against the configured `ColumnSet` so that vector component order can never
//! silently disagree between history, scaler and model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[cfg(test)]
use serde::Serialize;

use crate::domain::ColumnSet;
use crate::error::AppError;
use crate::math::Scaler;
use crate::models::{LinearModelFile, LinearWindowModel};

/// Read a scaler JSON file and check it against `columns`.
pub fn read_scaler_json(path: &Path, columns: &ColumnSet) -> Result<Scaler, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open scaler JSON '{}': {e}", path.display())))?;
    let scaler: Scaler = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid scaler JSON: {e}")))?;

    scaler
        .validate()
        .map_err(|e| AppError::new(2, format!("Invalid scaler: {e}")))?;
    ensure_columns("scaler", scaler.columns(), columns)?;
    Ok(scaler)
}

/// Read a linear window model JSON file and check it against `columns` and `look_back`.
pub fn read_model_json(path: &Path, columns: &ColumnSet, look_back: usize) -> Result<LinearWindowModel, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let raw: LinearModelFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;

    ensure_columns("model", &raw.columns, columns)?;
    if raw.look_back != look_back {
        return Err(AppError::new(
            2,
            format!(
                "Model was trained with look-back {}, but {look_back} is configured.",
                raw.look_back
            ),
        ));
    }

    LinearWindowModel::from_file(raw).map_err(|e| AppError::new(2, format!("Invalid model: {e}")))
}

/// Write a serializable artifact as pretty JSON (test fixtures).
#[cfg(test)]
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value).map_err(|e| AppError::new(2, format!("Failed to write JSON: {e}")))
}

fn ensure_columns(what: &str, found: &ColumnSet, expected: &ColumnSet) -> Result<(), AppError> {
    if found != expected {
        return Err(AppError::new(
            2,
            format!("The {what} was fitted on columns [{found}], but [{expected}] are configured."),
        ));
    }
    Ok(())
}
