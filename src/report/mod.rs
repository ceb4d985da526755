//! Reporting utilities: terminal tables and value formatting.

pub mod format;

pub use format::*;
