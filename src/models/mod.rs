//! Sequence model seam and the bundled linear window model.
//!
//! Models only ever see normalized vectors; scaling happens in the forecaster.

pub mod model;
pub mod window;

pub use model::*;
pub use window::*;
