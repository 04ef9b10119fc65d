//! World Magnetic Model evaluator
//!
//! Parses NOAA coefficient files (`WMM.COF`) and evaluates the spherical-harmonic expansion of
//! the main field with its secular variation. Positions are geodetic (WGS84); the field is
//! computed in geocentric spherical coordinates and rotated back to the geodetic frame.
//!
//! Coefficient file layout:
//!
//! ```text
//!     2020.0            WMM-2020        12/10/2019
//!   1  0  -29404.5       0.0        6.7        0.0
//!   ...
//! 999999999999999999999999999999999999999999999999
//! ```
//!
//! The header carries the model epoch and name; each row is `n m g h g_dot h_dot` in nT and
//! nT/year. Rows stop at the first line of nines.

use super::{MagneticField, MagneticModel};
use crate::{Result, RouteError};
use std::path::Path;

/// WMM2020 coefficients, valid 2020.0 - 2025.0
const WMM2020_COF: &str = include_str!("../../data/WMM2020.COF");

/// Geomagnetic reference radius in km
const REFERENCE_RADIUS_KM: f64 = 6371.2;
/// WGS84 semi-major axis in km
const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257223563;
/// Lifetime of a model release in years
const VALIDITY_YEARS: f64 = 5.0;
/// Altitude range the model is specified for, km above the ellipsoid
const ALTITUDE_RANGE_KM: (f64, f64) = (-1.0, 850.0);
/// Lower bound for cos(geocentric latitude); poles are evaluated this close to the axis
const POLE_EPSILON: f64 = 1e-10;

/// Spherical-harmonic main field model with linear secular variation
#[derive(Debug, Clone)]
pub struct WorldMagneticModel {
    name: String,
    epoch: f64,
    max_degree: usize,
    /// Gauss coefficients, triangular storage indexed by [`index`]
    g: Vec<f64>,
    h: Vec<f64>,
    g_dot: Vec<f64>,
    h_dot: Vec<f64>,
    /// Evaluate outside `[epoch, epoch + 5)` instead of failing
    allow_extrapolation: bool,
}

/// Position of `(n, m)` in triangular storage
#[inline(always)]
fn index(n: usize, m: usize) -> usize {
    n * (n + 1) / 2 + m
}

fn invalid_model(line: usize, reason: impl std::fmt::Display) -> RouteError {
    RouteError::InvalidModel(format!("line {line}: {reason}"))
}

impl WorldMagneticModel {
    /// The embedded WMM2020 model
    pub fn wmm2020() -> Result<Self> {
        Self::parse_cof(WMM2020_COF)
    }

    /// Load a coefficient file from disk
    pub fn from_cof_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let model = Self::parse_cof(&content)?;
        tracing::info!(
            "Loaded magnetic model {} (epoch {:.1}, degree {}) from {}",
            model.name,
            model.epoch,
            model.max_degree,
            path.as_ref().display()
        );
        Ok(model)
    }

    /// Parse the text of a coefficient file
    pub fn parse_cof(content: &str) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| RouteError::InvalidModel("empty coefficient file".to_string()))?;
        let mut header_fields = header.split_whitespace();
        let epoch: f64 = header_fields
            .next()
            .and_then(|field| field.parse().ok())
            .filter(|epoch: &f64| epoch.is_finite())
            .ok_or_else(|| invalid_model(header_line, "header must start with the model epoch"))?;
        let name = header_fields.next().unwrap_or("unnamed").to_string();

        let mut rows: Vec<(usize, usize, [f64; 4])> = Vec::new();
        for (line_no, line) in lines {
            if line.starts_with("9999") {
                break;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 {
                return Err(invalid_model(line_no, "expected `n m g h g_dot h_dot`"));
            }
            let n: usize = fields[0]
                .parse()
                .map_err(|_| invalid_model(line_no, format!("bad degree '{}'", fields[0])))?;
            let m: usize = fields[1]
                .parse()
                .map_err(|_| invalid_model(line_no, format!("bad order '{}'", fields[1])))?;
            if n == 0 || m > n {
                return Err(invalid_model(line_no, format!("invalid term n={n} m={m}")));
            }
            let mut values = [0.0; 4];
            for (slot, field) in values.iter_mut().zip(&fields[2..6]) {
                *slot = field
                    .parse()
                    .map_err(|_| invalid_model(line_no, format!("bad coefficient '{field}'")))?;
            }
            rows.push((n, m, values));
        }

        let max_degree = rows
            .iter()
            .map(|(n, _, _)| *n)
            .max()
            .ok_or_else(|| RouteError::InvalidModel("no coefficient rows".to_string()))?;

        let size = index(max_degree, max_degree) + 1;
        let mut model = Self {
            name,
            epoch,
            max_degree,
            g: vec![0.0; size],
            h: vec![0.0; size],
            g_dot: vec![0.0; size],
            h_dot: vec![0.0; size],
            allow_extrapolation: false,
        };
        for (n, m, [g, h, g_dot, h_dot]) in rows {
            let i = index(n, m);
            model.g[i] = g;
            model.h[i] = h;
            model.g_dot[i] = g_dot;
            model.h_dot[i] = h_dot;
        }

        tracing::debug!(
            "Parsed magnetic model {} epoch {} up to degree {}",
            model.name,
            model.epoch,
            model.max_degree
        );
        Ok(model)
    }

    /// Allow evaluation outside the five-year validity window
    ///
    /// The secular variation is extrapolated linearly and a warning is logged per evaluation.
    pub fn with_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base epoch of the coefficients
    #[inline]
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    #[inline]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Decimal years `[start, end)` the model is valid for
    #[inline]
    pub fn validity(&self) -> (f64, f64) {
        (self.epoch, self.epoch + VALIDITY_YEARS)
    }

    fn check_domain(&self, lat: f64, lon: f64, alt: f64, year: f64) -> Result<()> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(RouteError::ModelDomain(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(RouteError::ModelDomain(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        let (min_alt, max_alt) = ALTITUDE_RANGE_KM;
        if !alt.is_finite() || !(min_alt..=max_alt).contains(&alt) {
            return Err(RouteError::ModelDomain(format!(
                "altitude {alt} km outside [{min_alt}, {max_alt}]"
            )));
        }
        let (start, end) = self.validity();
        if !year.is_finite() {
            return Err(RouteError::ModelDomain(format!("decimal year {year}")));
        }
        if year < start || year >= end {
            if !self.allow_extrapolation {
                return Err(RouteError::ModelDomain(format!(
                    "decimal year {year:.4} outside {} validity [{start:.1}, {end:.1})",
                    self.name
                )));
            }
            tracing::warn!(
                "Extrapolating {} to {year:.4}, outside [{start:.1}, {end:.1})",
                self.name
            );
        }
        Ok(())
    }

    /// Schmidt semi-normalized associated Legendre functions of `cos(theta)` and their
    /// derivatives with respect to the colatitude `theta`
    ///
    /// `x = cos(theta)` is the sine of the geocentric latitude, `s = sin(theta)` its cosine.
    fn legendre(&self, x: f64, s: f64) -> (Vec<f64>, Vec<f64>) {
        let size = index(self.max_degree, self.max_degree) + 1;
        let mut p = vec![0.0; size];
        let mut dp = vec![0.0; size];
        p[0] = 1.0;

        for n in 1..=self.max_degree {
            let nf = n as f64;
            for m in 0..=n {
                let i = index(n, m);
                if n == m {
                    let j = index(n - 1, n - 1);
                    if n == 1 {
                        p[i] = s;
                        dp[i] = x;
                    } else {
                        let k = ((2.0 * nf - 1.0) / (2.0 * nf)).sqrt();
                        p[i] = k * s * p[j];
                        dp[i] = k * (x * p[j] + s * dp[j]);
                    }
                } else {
                    let mf = m as f64;
                    let j = index(n - 1, m);
                    let k1 = 2.0 * nf - 1.0;
                    let denominator = (nf * nf - mf * mf).sqrt();
                    let (k2, p2, dp2) = if m + 2 <= n {
                        let j2 = index(n - 2, m);
                        (((nf - 1.0).powi(2) - mf * mf).sqrt(), p[j2], dp[j2])
                    } else {
                        (0.0, 0.0, 0.0)
                    };
                    p[i] = (k1 * x * p[j] - k2 * p2) / denominator;
                    dp[i] = (k1 * (x * dp[j] - s * p[j]) - k2 * dp2) / denominator;
                }
            }
        }

        (p, dp)
    }
}

impl MagneticModel for WorldMagneticModel {
    fn evaluate(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_km: f64,
        decimal_year: f64,
    ) -> Result<MagneticField> {
        #[cfg(feature = "profiling")]
        profiling::scope!("wmm::evaluate");

        self.check_domain(latitude_deg, longitude_deg, altitude_km, decimal_year)?;

        // Geodetic to geocentric spherical
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let phi = latitude_deg.to_radians();
        let lambda = longitude_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let prime_vertical = WGS84_A_KM / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let p = (prime_vertical + altitude_km) * cos_phi;
        let z = (prime_vertical * (1.0 - e2) + altitude_km) * sin_phi;
        let r = p.hypot(z);
        let phi_c = (z / r).asin();
        let (mut x, mut s) = phi_c.sin_cos();
        // Legendre terms and the east divisor share one clamped colatitude
        if s < POLE_EPSILON {
            s = POLE_EPSILON;
            x = x.signum() * (1.0 - s * s).sqrt();
        }

        let (legendre, d_legendre) = self.legendre(x, s);
        let dt = decimal_year - self.epoch;
        let ratio = REFERENCE_RADIUS_KM / r;

        let mut north = 0.0;
        let mut east = 0.0;
        let mut down = 0.0;
        // (a / r)^(n + 2)
        let mut radial = ratio * ratio;
        for n in 1..=self.max_degree {
            radial *= ratio;
            for m in 0..=n {
                let i = index(n, m);
                let g = self.g[i] + dt * self.g_dot[i];
                let h = self.h[i] + dt * self.h_dot[i];
                let (sin_ml, cos_ml) = (m as f64 * lambda).sin_cos();
                let term = g * cos_ml + h * sin_ml;

                north += radial * term * d_legendre[i];
                east += radial * m as f64 * (g * sin_ml - h * cos_ml) * legendre[i];
                down -= radial * (n + 1) as f64 * term * legendre[i];
            }
        }
        east /= s;

        // Rotate from geocentric to geodetic
        let (sin_psi, cos_psi) = (phi_c - phi).sin_cos();
        let north_geodetic = north * cos_psi - down * sin_psi;
        let down_geodetic = north * sin_psi + down * cos_psi;

        Ok(MagneticField::from_components(
            north_geodetic,
            east,
            down_geodetic,
        ))
    }
}
