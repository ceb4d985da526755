//! Domain types used throughout the service.
//!
//! This module defines:
//!
//! - the tracked column order (`ColumnSet`)
//! - the daily history table (`TimeSeriesTable`, `DailyRow`)
//! - forecast outputs and tunables (`ForecastResult`, `ForecastSettings`)

pub mod types;

pub use types::*;
