//! Anigmaa CLI - a command-line client for the Anigmaa events platform.
//!
//! Signs in with Google, keeps the session in a file or the OS keychain, and
//! prints API results as JSON.

mod args;
mod commands;

use std::io;
use std::process::ExitCode;

use anigmaa_core::ApiError;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::Cli;

/// Log file name prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "anigmaa.log";

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the log file on drop and must outlive `main`.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(&cli);
    info!("anigmaa starting");

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("Error: {:#}", e);
            if e
                .downcast_ref::<ApiError>()
                .is_some_and(ApiError::requires_reauthentication)
            {
                eprintln!("Your session has ended. Run `anigmaa login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}
