//! Computed leg between two consecutive waypoints

use crate::Waypoint;

/// Distance and bearings of one leg of a route
///
/// Bearings are in `[0, 360)` degrees, clockwise from true or magnetic north respectively.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegResult {
    /// Zero-based position of the leg in the route
    pub sequence_index: usize,
    pub origin: Waypoint,
    pub destination: Waypoint,
    /// Forward azimuth at the origin, from true north
    pub true_bearing_deg: f64,
    /// `true_bearing_deg` corrected by the declination at the origin
    pub magnetic_bearing_deg: f64,
    /// Declination used for the correction, positive east
    pub declination_deg: f64,
    /// Ellipsoidal geodesic length in meters
    pub distance_m: f64,
}

impl LegResult {
    /// Length in nautical miles for the given nautical mile definition
    #[inline]
    pub fn distance_nm(&self, meters_per_nautical_mile: f64) -> f64 {
        self.distance_m / meters_per_nautical_mile
    }

    /// Whether origin and destination coincide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.distance_m == 0.0
    }
}
