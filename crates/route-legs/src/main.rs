//! Route Legs - command line entry point
//!
//! ```text
//! route-legs <ROUTE_FILE> <DATE> [OPTIONS]
//! ```
//!
//! Prints the report to stdout. Wrong arguments print usage and exit with status 2; any other
//! failure prints the error to stderr and exits with status 1 without printing a report.

mod logging;
mod run;
mod settings;

use clap::Parser;
use settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::parse();
    logging::setup_logging(settings.verbose);
    tracing::debug!("Settings: {settings:?}");

    let stdout = std::io::stdout();
    match run::run(&settings, stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Run failed: {err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
