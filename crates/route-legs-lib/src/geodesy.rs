//! Geodesic inverse problem on the WGS84 ellipsoid

use crate::Result;
use geo::{Bearing, Distance, Geodesic, Point};

/// Solution of the geodesic inverse problem between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseSolution {
    /// Azimuth at the first point towards the second, degrees clockwise from true north.
    /// May be negative or otherwise outside `[0, 360)`.
    pub forward_azimuth_deg: f64,
    /// Azimuth at the second point towards the first
    pub back_azimuth_deg: f64,
    /// Length of the geodesic in meters
    pub distance_m: f64,
}

/// A geodesic inverse solver bound to one reference ellipsoid
///
/// Arguments are in `(longitude, latitude)` axis order for both points. Swapping the order
/// silently produces wrong bearings, so implementations must take the arguments as given.
pub trait GeodesicSolver {
    fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Result<InverseSolution>;
}

/// Karney's geodesic algorithm on WGS84, as provided by `geo`
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Geodesic;

impl GeodesicSolver for Wgs84Geodesic {
    fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Result<InverseSolution> {
        #[cfg(feature = "profiling")]
        profiling::scope!("geodesy::inverse");

        let origin = Point::new(lon1, lat1);
        let destination = Point::new(lon2, lat2);

        Ok(InverseSolution {
            forward_azimuth_deg: Geodesic.bearing(origin, destination),
            back_azimuth_deg: Geodesic.bearing(destination, origin),
            distance_m: Geodesic.distance(origin, destination),
        })
    }
}

impl<T: GeodesicSolver + ?Sized> GeodesicSolver for &T {
    fn inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Result<InverseSolution> {
        (**self).inverse(lon1, lat1, lon2, lat2)
    }
}
