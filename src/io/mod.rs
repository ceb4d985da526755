//! Input/output helpers.
//!
//! - history CSV ingest + validation (`ingest`)
//! - model/scaler JSON artifacts (`artifacts`)
//! - forecast CSV exports (`export`)

pub mod artifacts;
pub mod export;
pub mod ingest;

pub use artifacts::*;
pub use export::*;
pub use ingest::*;
