//! RoutePlanner - Leg computation over a route
//!
//! Drives the geodesic solver and the magnetic model for every pair of consecutive waypoints
//! and composes the bearings. The planner holds no per-route state, so one instance can serve
//! any number of routes and legs can be computed independently.

use crate::{
    Epoch, GeodesicSolver, LegResult, MagneticModel, Result, RouteError, Waypoint, azimuth,
};

use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constants used when computing legs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Length of a nautical mile in meters (default 1852)
    pub meters_per_nautical_mile: f64,
    /// Height above the ellipsoid at which the magnetic model is evaluated, km
    pub altitude_km: f64,
    /// Legs no longer than this are treated as zero length with a true bearing of 0
    pub coincident_threshold_m: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            meters_per_nautical_mile: 1852.0,
            altitude_km: 0.0,
            coincident_threshold_m: 0.001,
        }
    }
}

/// Computes [`LegResult`]s from waypoints using a geodesic solver and a magnetic model
#[derive(Debug, Clone)]
pub struct RoutePlanner<G, M> {
    config: PlannerConfig,
    solver: G,
    model: M,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<G: GeodesicSolver, M: MagneticModel> RoutePlanner<G, M> {
    pub fn new(config: PlannerConfig, solver: G, model: M) -> Self {
        Self {
            config,
            solver,
            model,
        }
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Compute one leg
    ///
    /// The declination is taken at the origin and applied to the whole leg.
    ///
    /// # Arguments
    /// * `index` - Position of the leg in the route, copied into the result
    /// * `origin` - Start of the leg
    /// * `destination` - End of the leg
    /// * `epoch` - Date at which the magnetic model is evaluated
    pub fn compute_leg(
        &self,
        index: usize,
        origin: &Waypoint,
        destination: &Waypoint,
        epoch: Epoch,
    ) -> Result<LegResult> {
        // Longitude first: the solver contract is (lon, lat)
        let solution = self.solver.inverse(
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )?;

        if !solution.forward_azimuth_deg.is_finite() || !solution.distance_m.is_finite() {
            return Err(RouteError::GeodesyFailure {
                leg: index,
                reason: format!(
                    "non-finite solution (azimuth {}, distance {})",
                    solution.forward_azimuth_deg, solution.distance_m
                ),
            });
        }
        if solution.distance_m < 0.0 {
            return Err(RouteError::GeodesyFailure {
                leg: index,
                reason: format!("negative distance {}", solution.distance_m),
            });
        }

        let (forward_azimuth, distance_m) =
            if solution.distance_m <= self.config.coincident_threshold_m {
                tracing::warn!(
                    "Leg {index} from {} to {} has zero length, using true north as its bearing",
                    origin.name(),
                    destination.name()
                );
                (0.0, 0.0)
            } else {
                (solution.forward_azimuth_deg, solution.distance_m)
            };

        let declination = self.model.declination(
            origin.latitude(),
            origin.longitude(),
            self.config.altitude_km,
            epoch.decimal_year(),
        )?;
        if !declination.is_finite() {
            return Err(RouteError::ModelDomain(format!(
                "non-finite declination at {}",
                origin.name()
            )));
        }

        let leg = LegResult {
            sequence_index: index,
            origin: origin.clone(),
            destination: destination.clone(),
            true_bearing_deg: azimuth::normalize(forward_azimuth),
            magnetic_bearing_deg: azimuth::normalize(forward_azimuth - declination),
            declination_deg: declination,
            distance_m,
        };

        tracing::debug!(
            "Leg {index}: {} -> {} {:.3}°T {:.3}°M (decl {:.3}°) {:.1} m",
            origin.name(),
            destination.name(),
            leg.true_bearing_deg,
            leg.magnetic_bearing_deg,
            declination,
            distance_m
        );

        Ok(leg)
    }

    /// Compute every leg of a route in order
    ///
    /// Returns an empty vector for fewer than two waypoints. The first failing leg aborts the
    /// whole computation.
    pub fn compute_route(&self, waypoints: &[Waypoint], epoch: Epoch) -> Result<Vec<LegResult>> {
        let legs = waypoints
            .windows(2)
            .enumerate()
            .map(|(i, pair)| self.compute_leg(i, &pair[0], &pair[1], epoch))
            .collect::<Result<Vec<_>>>()?;

        self.log_totals(&legs);
        Ok(legs)
    }

    fn log_totals(&self, legs: &[LegResult]) {
        let total_m: f64 = legs.iter().map(|leg| leg.distance_m).sum();
        tracing::info!(
            "Computed {} legs, {:.1} nm total",
            legs.len(),
            total_m / self.config.meters_per_nautical_mile
        );
    }
}

impl<G, M> RoutePlanner<G, M>
where
    G: GeodesicSolver + Sync,
    M: MagneticModel + Sync,
{
    /// Compute every leg on the rayon thread pool
    ///
    /// Produces the same legs in the same order as [`RoutePlanner::compute_route`]. When
    /// several legs fail, the error of the lowest leg index is returned.
    pub fn compute_route_parallel(
        &self,
        waypoints: &[Waypoint],
        epoch: Epoch,
    ) -> Result<Vec<LegResult>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("planner::compute_route_parallel");

        let results: Vec<Result<LegResult>> = waypoints
            .par_windows(2)
            .enumerate()
            .map(|(i, pair)| self.compute_leg(i, &pair[0], &pair[1], epoch))
            .collect();

        let legs = results.into_iter().collect::<Result<Vec<_>>>()?;
        self.log_totals(&legs);
        Ok(legs)
    }
}
