//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - loads the model, scaler and history into an `AppContext`
//! - serves HTTP, or prints a one-shot forecast / inspection report

use std::sync::Arc;

use clap::Parser;

use crate::cli::{Command, ComponentArgs, ForecastArgs, ServeArgs};
use crate::error::AppError;

pub mod context;

pub use context::{AppContext, Readiness};

/// Entry point for the `cf` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

/// Install the global `tracing` subscriber (`RUST_LOG` overrides the default filter).
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commodity_forecast=info,tower_http=info".into()),
        )
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let ctx = Arc::new(AppContext::load(&args.components)?);
    if !ctx.readiness().all() {
        tracing::warn!("starting with missing components; forecasts will be refused");
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(ctx, &args.host, args.port))
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let ctx = AppContext::load(&args.components)?;

    let selected: Vec<String> = args
        .crops
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let result = ctx.forecast(&args.date, &selected)?;

    println!("{}", crate::report::format_forecast(&result, ctx.end_date()));
    if args.trajectory {
        println!("{}", crate::report::format_trajectory(&result));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_forecast_csv(path, &result)?;
        tracing::info!(path = %path.display(), "forecast exported");
    }

    Ok(())
}

fn handle_inspect(args: ComponentArgs) -> Result<(), AppError> {
    let ctx = AppContext::load(&args)?;
    let ready = ctx.readiness();
    let mark = |ok: bool| if ok { "loaded" } else { "MISSING" };

    println!("History: {} ({})", mark(ready.history), args.data.display());
    println!("Model:   {} ({})", mark(ready.model), args.model.display());
    println!("Scaler:  {} ({})", mark(ready.scaler), args.scaler.display());
    println!("Look-back: {}", ctx.settings().look_back);
    match ctx.settings().max_horizon_days {
        Some(max) => println!("Max horizon: {max} days"),
        None => println!("Max horizon: unbounded"),
    }
    if let Some(table) = ctx.history() {
        print!("{}", crate::report::format_history_summary(table));
    }

    if ready.all() {
        Ok(())
    } else {
        Err(AppError::new(3, "One or more components failed to load."))
    }
}

/// Rewrite argv so `cf` defaults to `cf serve`.
///
/// Rules:
/// - `cf`                       -> `cf serve`
/// - `cf --port 8080 ...`       -> `cf serve --port 8080 ...`
/// - `cf --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "forecast" | "inspect");
    if is_subcommand {
        return argv;
    }

    // A leading flag is treated as a `serve` flag.
    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_serves() {
        assert_eq!(rewrite_args(argv(&["cf"])), argv(&["cf", "serve"]));
        assert_eq!(
            rewrite_args(argv(&["cf", "--port", "8080"])),
            argv(&["cf", "serve", "--port", "8080"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["cf", "forecast", "-d", "2024-01-01"])),
            argv(&["cf", "forecast", "-d", "2024-01-01"])
        );
        assert_eq!(rewrite_args(argv(&["cf", "--help"])), argv(&["cf", "--help"]));
    }
}
