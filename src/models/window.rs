//! Sliding window of normalized daily vectors.

use std::collections::VecDeque;

use crate::error::ForecastError;

/// Fixed-length window of normalized vectors, oldest first.
///
/// The length never changes after construction: `push` drops the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedWindow {
    width: usize,
    entries: VecDeque<Vec<f64>>,
}

impl NormalizedWindow {
    /// Build a window from `look_back` vectors of equal width.
    pub fn new(entries: Vec<Vec<f64>>) -> Result<Self, ForecastError> {
        let width = entries
            .first()
            .map(Vec::len)
            .ok_or_else(|| ForecastError::ShapeMismatch("window must not be empty".to_string()))?;
        if width == 0 {
            return Err(ForecastError::ShapeMismatch("window vectors must not be empty".to_string()));
        }
        if entries.iter().any(|e| e.len() != width) {
            return Err(ForecastError::ShapeMismatch("window vectors differ in width".to_string()));
        }
        Ok(Self {
            width,
            entries: entries.into(),
        })
    }

    /// Number of days in the window (`K`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of columns per day.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn entries(&self) -> impl Iterator<Item = &[f64]> {
        self.entries.iter().map(Vec::as_slice)
    }

    /// Row-major flattening, oldest day first: shape `(K * width)`.
    pub fn flatten(&self) -> Vec<f64> {
        self.entries.iter().flatten().copied().collect()
    }

    /// Slide forward: drop the oldest vector and append `next`.
    pub fn push(&mut self, next: Vec<f64>) -> Result<(), ForecastError> {
        if next.len() != self.width {
            return Err(ForecastError::ShapeMismatch(format!(
                "window expects {} values per day, got {}",
                self.width,
                next.len()
            )));
        }
        self.entries.pop_front();
        self.entries.push_back(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_length_and_order() {
        let mut w = NormalizedWindow::new(vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]).unwrap();
        w.push(vec![4.0, 4.0]).unwrap();
        assert_eq!(w.len(), 3);
        assert_eq!(w.flatten(), vec![2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);

        assert!(w.push(vec![5.0]).is_err());
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn rejects_ragged_or_empty_input() {
        assert!(NormalizedWindow::new(vec![]).is_err());
        assert!(NormalizedWindow::new(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
