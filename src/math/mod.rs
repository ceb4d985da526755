//! Numeric helpers: fitted per-column scaling.

pub mod scaler;

pub use scaler::*;
