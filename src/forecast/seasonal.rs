//! Deterministic seasonal adjustment.
//!
//! Each output value is scaled by a yearly sine term and a small noise term. The noise
//! is drawn from an RNG seeded by `md5("{date}|{column}")`, so the same date and
//! column always receive the same perturbation.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::ColumnSet;

/// Which amplitude set to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustMode {
    /// Known history; smaller perturbation.
    Historical,
    /// Rolled-out prediction; larger perturbation.
    Future,
}

impl AdjustMode {
    pub fn season_amplitude(self) -> f64 {
        match self {
            AdjustMode::Historical => 0.01,
            AdjustMode::Future => 0.03,
        }
    }

    pub fn noise_amplitude(self) -> f64 {
        match self {
            AdjustMode::Historical => 0.005,
            AdjustMode::Future => 0.01,
        }
    }
}

/// Seasonal multiplier for a calendar day: `1 + amp * sin(2π * doy / 365)`.
pub fn season_factor(date: NaiveDate, mode: AdjustMode) -> f64 {
    let day_of_year = date.ordinal() as f64;
    1.0 + mode.season_amplitude() * (2.0 * PI * day_of_year / 365.0).sin()
}

/// Seed derived from the first 32 bits of `md5("{YYYY-MM-DD}|{column}")`.
pub fn noise_seed(date: NaiveDate, column: &str) -> u32 {
    let key = format!("{}|{column}", date.format("%Y-%m-%d"));
    let digest = md5::compute(key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Uniform noise in `[-amp, amp)` for one (date, column) pair.
pub fn noise(date: NaiveDate, column: &str, mode: AdjustMode) -> f64 {
    let amp = mode.noise_amplitude();
    let mut rng = StdRng::seed_from_u64(u64::from(noise_seed(date, column)));
    rng.gen_range(-amp..amp)
}

/// Apply the seasonal/noise perturbation to a raw vector ordered like `columns`.
///
/// Output values are never negative. `base_date` is the last known date; it only
/// feeds the trace log.
pub fn adjust(
    raw: &[f64],
    target_date: NaiveDate,
    base_date: NaiveDate,
    columns: &ColumnSet,
    mode: AdjustMode,
) -> Vec<f64> {
    let days_ahead = (target_date - base_date).num_days().max(0);
    let season = season_factor(target_date, mode);
    tracing::trace!(%target_date, days_ahead, season, ?mode, "seasonal adjustment");

    raw.iter()
        .zip(columns.iter())
        .map(|(&value, column)| {
            let factor = (season * (1.0 + noise(target_date, column, mode))).max(0.0);
            (value * factor).max(0.0)
        })
        .collect()
}
