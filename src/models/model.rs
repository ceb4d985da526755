//! Sequence model evaluation.
//!
//! The forecaster only needs one primitive: map a window of `K` normalized daily
//! vectors to the next day's normalized vector. That seam is `SequenceModel`.
//!
//! The bundled implementation is a linear window model:
//!
//! ```text
//! y = W · flatten(window) + b        W: C × (K·C), b: C
//! ```

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::ColumnSet;
use crate::error::ForecastError;
use crate::models::NormalizedWindow;

/// A pretrained one-step-ahead predictor over normalized vectors.
pub trait SequenceModel: Send + Sync {
    /// Window length the model was trained with.
    fn look_back(&self) -> usize;

    /// Column order the model was trained with.
    fn columns(&self) -> &ColumnSet;

    /// Predict the next normalized vector.
    fn predict(&self, window: &NormalizedWindow) -> Result<Vec<f64>, ForecastError>;
}

/// On-disk representation of a linear window model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub look_back: usize,
    pub columns: ColumnSet,
    /// One row per output column, each `look_back * columns.len()` wide.
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LinearWindowModel {
    look_back: usize,
    columns: ColumnSet,
    weights: DMatrix<f64>,
    bias: DVector<f64>,
}

impl LinearWindowModel {
    pub fn from_file(file: LinearModelFile) -> Result<Self, ForecastError> {
        let c = file.columns.len();
        if file.look_back == 0 {
            return Err(ForecastError::ShapeMismatch("model look_back must be > 0".to_string()));
        }
        let inputs = file.look_back * c;

        if file.weights.len() != c {
            return Err(ForecastError::ShapeMismatch(format!(
                "model has {} weight rows, expected {c}",
                file.weights.len()
            )));
        }
        if let Some(row) = file.weights.iter().find(|r| r.len() != inputs) {
            return Err(ForecastError::ShapeMismatch(format!(
                "model weight row has {} entries, expected {inputs}",
                row.len()
            )));
        }
        if file.bias.len() != c {
            return Err(ForecastError::ShapeMismatch(format!(
                "model bias has {} entries, expected {c}",
                file.bias.len()
            )));
        }
        let all_finite = file.weights.iter().flatten().chain(&file.bias).all(|v| v.is_finite());
        if !all_finite {
            return Err(ForecastError::ShapeMismatch("model parameters must be finite".to_string()));
        }

        let flat: Vec<f64> = file.weights.into_iter().flatten().collect();
        Ok(Self {
            look_back: file.look_back,
            columns: file.columns,
            weights: DMatrix::from_row_slice(c, inputs, &flat),
            bias: DVector::from_vec(file.bias),
        })
    }
}

impl SequenceModel for LinearWindowModel {
    fn look_back(&self) -> usize {
        self.look_back
    }

    fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    fn predict(&self, window: &NormalizedWindow) -> Result<Vec<f64>, ForecastError> {
        if window.len() != self.look_back || window.width() != self.columns.len() {
            return Err(ForecastError::Inference(format!(
                "input shape (1, {}, {}) does not match model shape (1, {}, {})",
                window.len(),
                window.width(),
                self.look_back,
                self.columns.len()
            )));
        }

        let x = DVector::from_vec(window.flatten());
        let y = &self.weights * x + &self.bias;
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::Inference("non-finite model output".to_string()));
        }
        Ok(y.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Persistence model: tomorrow = today.
    fn persistence(look_back: usize, c: usize) -> LinearModelFile {
        let inputs = look_back * c;
        let weights = (0..c)
            .map(|i| {
                let mut row = vec![0.0; inputs];
                row[(look_back - 1) * c + i] = 1.0;
                row
            })
            .collect();
        LinearModelFile {
            look_back,
            columns: ColumnSet::new((0..c).map(|i| format!("c{i}"))).unwrap(),
            weights,
            bias: vec![0.0; c],
        }
    }

    #[test]
    fn persistence_model_repeats_last_day() {
        let model = LinearWindowModel::from_file(persistence(3, 2)).unwrap();
        let window = NormalizedWindow::new(vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]]).unwrap();
        assert_eq!(model.predict(&window).unwrap(), vec![0.5, 0.6]);
    }

    #[test]
    fn bias_is_added() {
        let mut file = persistence(1, 2);
        file.bias = vec![1.0, -1.0];
        let model = LinearWindowModel::from_file(file).unwrap();
        let window = NormalizedWindow::new(vec![vec![0.5, 0.5]]).unwrap();
        assert_eq!(model.predict(&window).unwrap(), vec![1.5, -0.5]);
    }

    #[test]
    fn shape_errors() {
        let mut bad = persistence(3, 2);
        bad.weights[0].pop();
        assert!(LinearWindowModel::from_file(bad).is_err());

        let mut bad = persistence(3, 2);
        bad.bias.push(0.0);
        assert!(LinearWindowModel::from_file(bad).is_err());

        let model = LinearWindowModel::from_file(persistence(3, 2)).unwrap();
        let short = NormalizedWindow::new(vec![vec![0.0, 0.0]]).unwrap();
        assert!(matches!(model.predict(&short), Err(ForecastError::Inference(_))));
    }
}
