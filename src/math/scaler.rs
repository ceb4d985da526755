//! Per-column affine scaling between raw values and model space.
//!
//! Two fitted conventions are supported:
//!
//! ```text
//! standard: z = (x - mean) / scale        x = z * scale + mean
//! min_max:  z = x * scale + min           x = (z - min) / scale
//! ```
//!
//! `min_max` follows the fitted-attribute layout of a typical min/max scaler, where
//! `min` is already the additive offset rather than the data minimum.

use serde::{Deserialize, Serialize};

use crate::domain::ColumnSet;
use crate::error::ForecastError;

/// Fitted scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard {
        columns: ColumnSet,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        columns: ColumnSet,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl Scaler {
    pub fn columns(&self) -> &ColumnSet {
        match self {
            Scaler::Standard { columns, .. } | Scaler::MinMax { columns, .. } => columns,
        }
    }

    /// Check internal consistency: one finite, non-zero scale per column.
    pub fn validate(&self) -> Result<(), ForecastError> {
        let (offset, scale) = self.params();
        let n = self.columns().len();
        if offset.len() != n || scale.len() != n {
            return Err(ForecastError::ShapeMismatch(format!(
                "scaler has {} offsets and {} scales for {n} columns",
                offset.len(),
                scale.len()
            )));
        }
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ShapeMismatch("scaler offset is not finite".to_string()));
        }
        if let Some(idx) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(ForecastError::ShapeMismatch(format!(
                "scaler scale for `{}` must be finite and non-zero",
                self.columns().names()[idx]
            )));
        }
        Ok(())
    }

    /// Raw vector -> normalized vector.
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ForecastError> {
        self.check_width(raw)?;
        let out = match self {
            Scaler::Standard { mean, scale, .. } => raw
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { min, scale, .. } => raw
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };
        Ok(out)
    }

    /// Normalized vector -> raw vector.
    pub fn inverse_transform(&self, scaled: &[f64]) -> Result<Vec<f64>, ForecastError> {
        self.check_width(scaled)?;
        let out = match self {
            Scaler::Standard { mean, scale, .. } => scaled
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(z, (m, s))| z * s + m)
                .collect(),
            Scaler::MinMax { min, scale, .. } => scaled
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(z, (m, s))| (z - m) / s)
                .collect(),
        };
        Ok(out)
    }

    fn params(&self) -> (&[f64], &[f64]) {
        match self {
            Scaler::Standard { mean, scale, .. } => (mean, scale),
            Scaler::MinMax { min, scale, .. } => (min, scale),
        }
    }

    fn check_width(&self, values: &[f64]) -> Result<(), ForecastError> {
        let n = self.columns().len();
        if values.len() != n {
            return Err(ForecastError::ShapeMismatch(format!(
                "scaler expects {n} values, got {}",
                values.len()
            )));
        }
        Ok(())
    }
}
