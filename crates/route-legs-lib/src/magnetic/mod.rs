//! Magnetic field models
//!
//! The pipeline only needs the declination at a leg's origin, but models report the full
//! field so callers can inspect it.

mod wmm;

pub use wmm::WorldMagneticModel;

use crate::Result;

/// Geomagnetic field at a point, geodetic frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagneticField {
    /// Angle from true north to magnetic north, positive east
    pub declination_deg: f64,
    /// Dip angle, positive down
    pub inclination_deg: f64,
    /// North component in nT
    pub north_nt: f64,
    /// East component in nT
    pub east_nt: f64,
    /// Down component in nT
    pub down_nt: f64,
    /// Horizontal intensity in nT
    pub horizontal_nt: f64,
    /// Total intensity in nT
    pub total_nt: f64,
}

impl MagneticField {
    /// Derive the angles and intensities from the north/east/down components
    pub fn from_components(north_nt: f64, east_nt: f64, down_nt: f64) -> Self {
        let horizontal_nt = north_nt.hypot(east_nt);
        Self {
            declination_deg: east_nt.atan2(north_nt).to_degrees(),
            inclination_deg: down_nt.atan2(horizontal_nt).to_degrees(),
            north_nt,
            east_nt,
            down_nt,
            horizontal_nt,
            total_nt: horizontal_nt.hypot(down_nt),
        }
    }
}

/// A model of the geomagnetic field over position and time
pub trait MagneticModel {
    /// Evaluate the field at a geodetic position and decimal year
    ///
    /// Fails with [`crate::RouteError::ModelDomain`] outside the model's valid domain.
    fn evaluate(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_km: f64,
        decimal_year: f64,
    ) -> Result<MagneticField>;

    /// Declination in degrees, positive when magnetic north is east of true north
    fn declination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_km: f64,
        decimal_year: f64,
    ) -> Result<f64> {
        Ok(self
            .evaluate(latitude_deg, longitude_deg, altitude_km, decimal_year)?
            .declination_deg)
    }
}

impl<T: MagneticModel + ?Sized> MagneticModel for &T {
    fn evaluate(&self, lat: f64, lon: f64, alt: f64, year: f64) -> Result<MagneticField> {
        (**self).evaluate(lat, lon, alt, year)
    }
}

impl<T: MagneticModel + ?Sized> MagneticModel for Box<T> {
    fn evaluate(&self, lat: f64, lon: f64, alt: f64, year: f64) -> Result<MagneticField> {
        (**self).evaluate(lat, lon, alt, year)
    }
}

/// A single declination everywhere and at all times
///
/// Used when the variation is taken from a chart instead of a global model. The horizontal
/// field is a unit vector along the declination; vertical and absolute intensities are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDeclination(pub f64);

impl MagneticModel for FixedDeclination {
    fn evaluate(&self, _lat: f64, _lon: f64, _alt: f64, _year: f64) -> Result<MagneticField> {
        let (east, north) = self.0.to_radians().sin_cos();
        let mut field = MagneticField::from_components(north, east, 0.0);
        field.declination_deg = self.0;
        Ok(field)
    }
}
