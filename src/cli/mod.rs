//! Command-line parsing for the commodity forecast service.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the forecasting code. Every option can also come from the
//! environment (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cf", version, about = "Commodity price forecasts from a pretrained sequence model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the web form and JSON API (default).
    Serve(ServeArgs),
    /// Forecast a single date and print the result.
    Forecast(ForecastArgs),
    /// Load every component and report what is available.
    Inspect(ComponentArgs),
}

/// Where the components live and how they fit together.
#[derive(Debug, Args, Clone)]
pub struct ComponentArgs {
    /// Daily history CSV (`Date` + one column per commodity).
    #[arg(long, env = "CF_DATA", default_value = "demo/data_mean.csv")]
    pub data: PathBuf,

    /// Model JSON artifact.
    #[arg(long, env = "CF_MODEL", default_value = "demo/model.json")]
    pub model: PathBuf,

    /// Scaler JSON artifact.
    #[arg(long, env = "CF_SCALER", default_value = "demo/scaler.json")]
    pub scaler: PathBuf,

    /// Look-back window length the model was trained with.
    #[arg(long, env = "CF_LOOK_BACK", default_value_t = crate::domain::DEFAULT_LOOK_BACK)]
    pub look_back: usize,

    /// Tracked columns in training order, comma separated. Defaults to the bundled commodities.
    #[arg(long, env = "CF_COLUMNS")]
    pub columns: Option<String>,

    /// Decimal places for rolled-out forecasts (lookups always use 2).
    #[arg(long, env = "CF_FORECAST_DECIMALS", default_value_t = 4)]
    pub forecast_decimals: usize,

    /// Refuse targets more than this many days past the last known date.
    #[arg(long, env = "CF_MAX_HORIZON_DAYS")]
    pub max_horizon_days: Option<u32>,
}

/// Options for `cf serve`.
#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub components: ComponentArgs,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
}

/// Options for `cf forecast`.
#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub components: ComponentArgs,

    /// Target date (YYYY-MM-DD).
    #[arg(long, short = 'd')]
    pub date: String,

    /// Only show these columns (comma separated).
    #[arg(long)]
    pub crops: Option<String>,

    /// Print every rolled-out day, not just the target.
    #[arg(long)]
    pub trajectory: bool,

    /// Export the result (trajectory for rollouts) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}
