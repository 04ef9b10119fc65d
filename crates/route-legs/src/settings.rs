use clap::{Parser, ValueEnum};
use route_legs_lib::PlannerConfig;
use route_legs_lib::report::ReportOptions;
use std::path::PathBuf;

/// Report encoding on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One text block per leg
    Text,
    /// A single JSON document
    Json,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Legs - Geodesic distance and true/magnetic bearing of every leg of a route
pub struct Settings {
    /// Route table (CSV rows of name, latitude, longitude) or GPX file
    #[clap(value_name = "ROUTE_FILE")]
    pub route_file: PathBuf,

    /// Reference date for the magnetic declination, e.g. 2024-06-15
    #[clap(value_name = "DATE")]
    pub date: String,

    /// World Magnetic Model coefficient file to use instead of the embedded WMM2020
    #[clap(short, long, value_name = "COF", env = "ROUTE_LEGS_MODEL")]
    pub model: Option<PathBuf>,

    /// Use this declination (degrees, east positive) everywhere instead of a model
    #[clap(
        long,
        value_name = "DEG",
        allow_negative_numbers = true,
        conflicts_with_all = ["model", "extrapolate"]
    )]
    pub declination: Option<f64>,

    /// Evaluate the model outside its five-year validity window
    #[clap(long, default_value = "false")]
    pub extrapolate: bool,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Compute legs on all cores
    #[clap(short, long, default_value = "false")]
    pub parallel: bool,

    /// Height above the WGS84 ellipsoid at which declination is evaluated, km
    #[clap(long, default_value = "0.0", allow_negative_numbers = true)]
    pub altitude_km: f64,

    /// Decimals shown on the minutes of positions
    #[clap(long, default_value = "3", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub minute_decimals: u8,

    /// Add the declination used for each leg to the text report
    #[clap(long, default_value = "false")]
    pub show_declination: bool,

    /// End the text report with the leg count and total distance
    #[clap(long, default_value = "false")]
    pub total: bool,

    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[clap(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Settings {
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            altitude_km: self.altitude_km,
            ..PlannerConfig::default()
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            minute_decimals: usize::from(self.minute_decimals),
            show_declination: self.show_declination,
            show_total: self.total,
            ..ReportOptions::default()
        }
    }
}
