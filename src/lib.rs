//! `commodity-forecast` library crate.
//!
//! The binary (`cf`) is a thin wrapper around this library so that:
//!
//! - forecasting logic is testable without spawning processes or sockets
//! - the web front-end and the CLI share one request pipeline (`app::AppContext`)

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod server;
