//! Forecasting core.
//!
//! - `rollout`: lookup-vs-rollout orchestration (`Forecaster`)
//! - `seasonal`: deterministic seasonal/noise adjustment
//! - `selection`: client column selection

pub mod rollout;
pub mod seasonal;
pub mod selection;

pub use rollout::*;
pub use seasonal::{AdjustMode, adjust};
pub use selection::*;
