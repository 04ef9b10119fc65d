//! Route Legs Library - Leg computation for multi-leg navigation routes
//!
//! This library computes, for an ordered list of waypoints, the WGS84 geodesic distance and the
//! true and magnetic bearing of every leg on a given date, and renders a per-leg report.
//!
//! # Architecture
//!
//! - **[`Epoch`]**: Calendar date as a decimal year for time-varying magnetic models
//! - **[`azimuth::normalize`]**: Folds any bearing into `[0, 360)`
//! - **[`GeodesicSolver`]** / **[`MagneticModel`]**: Capability traits for the numeric collaborators
//! - **[`RoutePlanner`]**: Leg computer and route pipeline producing [`LegResult`]s
//! - **[`report`]**: Fixed-precision text rendering of the legs
//!
//! # Example
//!
//! ```no_run
//! use route_legs_lib::{Epoch, PlannerConfig, RoutePlanner, Wgs84Geodesic, WorldMagneticModel};
//!
//! # fn demo() -> route_legs_lib::Result<()> {
//! let route = route_legs_lib::source::load_route("route.csv")?;
//! let epoch = Epoch::parse("2024-06-15")?;
//! let planner = RoutePlanner::new(
//!     PlannerConfig::default(),
//!     Wgs84Geodesic,
//!     WorldMagneticModel::wmm2020()?,
//! );
//! let legs = planner.compute_route(route.waypoints(), epoch)?;
//! print!("{}", route_legs_lib::report::render_report(&legs, &Default::default()));
//! # Ok(())
//! # }
//! ```

pub mod azimuth;
pub mod coord;
mod epoch;
mod geodesy;
mod leg;
pub mod magnetic;
mod planner;
pub mod report;
mod route;
pub mod source;

// Public API exports
pub use epoch::{Epoch, parse_date};
pub use geodesy::{GeodesicSolver, InverseSolution, Wgs84Geodesic};
pub use leg::LegResult;
pub use magnetic::{FixedDeclination, MagneticField, MagneticModel, WorldMagneticModel};
pub use planner::{PlannerConfig, RoutePlanner};
pub use route::{Route, Waypoint};

/// Error types for route loading and leg computation
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error("Malformed route row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GPX parsing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty route")]
    EmptyRoute,

    #[error("Geodesic solution failed for leg {leg}: {reason}")]
    GeodesyFailure { leg: usize, reason: String },

    #[error("Magnetic model domain exceeded: {0}")]
    ModelDomain(String),

    #[error("Invalid magnetic model: {0}")]
    InvalidModel(String),
}

impl RouteError {
    /// Whether the error stems from malformed user input (route table, coordinates, date)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RouteError::InvalidCoordinate { .. }
                | RouteError::InvalidDate(_)
                | RouteError::InvalidWaypoint(_)
                | RouteError::MalformedRow { .. }
                | RouteError::Csv(_)
                | RouteError::Gpx(_)
                | RouteError::Io(_)
                | RouteError::EmptyRoute
        )
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
