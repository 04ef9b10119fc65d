//! Waypoint and route storage
//!
//! A [`Route`] is an ordered, immutable list of [`Waypoint`]s. The order defines which
//! waypoints form a leg: waypoint `i` and waypoint `i + 1`.

use crate::{Result, RouteError};

/// A named position in decimal degrees
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl Waypoint {
    /// Create a waypoint, validating the name and coordinate ranges
    ///
    /// # Arguments
    /// * `name` - Non-empty label; duplicates across a route are allowed
    /// * `latitude` - Decimal degrees in `[-90, 90]`
    /// * `longitude` - Decimal degrees in `[-180, 180]`
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RouteError::InvalidWaypoint(
                "waypoint name must not be empty".to_string(),
            ));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(RouteError::InvalidWaypoint(format!(
                "{name}: latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(RouteError::InvalidWaypoint(format!(
                "{name}: longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            name,
            latitude,
            longitude,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in decimal degrees
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// An ordered sequence of at least one waypoint
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create a route from waypoints in travel order
    ///
    /// Returns [`RouteError::EmptyRoute`] when no waypoints are given.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self> {
        if waypoints.is_empty() {
            return Err(RouteError::EmptyRoute);
        }
        Ok(Self { waypoints })
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false for a constructed route; present for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of legs, `max(0, len - 1)`
    #[inline]
    pub fn leg_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }
}
