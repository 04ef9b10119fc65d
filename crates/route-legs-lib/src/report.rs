//! Per-leg text report
//!
//! Each leg renders as a fixed block:
//!
//! ```text
//! Leg 0: from Golden Gate to San Diego
//! 	Start:    37°49.194'N 122°28.698'W
//! 	End:      32°42.942'N 117°09.666'W
//! 	Bearing:  138° (T)  125° (M)
//! 	Distance: 402.0 nm
//! ```
//!
//! All displayed numbers are rounded half away from zero (`f64::round`), not with the
//! round-half-to-even rule of `format!("{:.0}")`.

use crate::{LegResult, Result, coord};
use std::fmt::Write as _;
use std::io::Write;

/// Rendering options
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportOptions {
    /// Length of a nautical mile in meters
    pub meters_per_nautical_mile: f64,
    /// Decimals shown on the minutes of positions
    pub minute_decimals: usize,
    /// Add a line with the declination used for each leg
    pub show_declination: bool,
    /// Close the report with the leg count and summed distance
    pub show_total: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            meters_per_nautical_mile: 1852.0,
            minute_decimals: 3,
            show_declination: false,
            show_total: false,
        }
    }
}

/// Round a bearing to whole degrees for display, keeping it in `[0, 360)`
pub fn display_bearing(bearing_deg: f64) -> u16 {
    let rounded = bearing_deg.round();
    if rounded >= 360.0 || rounded <= 0.0 {
        0
    } else {
        rounded as u16
    }
}

/// Round a distance in meters to tenths of a nautical mile
pub fn display_distance_nm(distance_m: f64, meters_per_nautical_mile: f64) -> f64 {
    (distance_m / meters_per_nautical_mile * 10.0).round() / 10.0
}

fn format_position(latitude: f64, longitude: f64, minute_decimals: usize) -> String {
    format!(
        "{} {}",
        coord::format_latitude_dm(latitude, minute_decimals),
        coord::format_longitude_dm(longitude, minute_decimals)
    )
}

/// Render one leg as a multi-line block ending in a newline
pub fn format_leg(leg: &LegResult, options: &ReportOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "Leg {}: from {} to {}",
        leg.sequence_index,
        leg.origin.name(),
        leg.destination.name()
    );
    let _ = writeln!(
        out,
        "\tStart:    {}",
        format_position(
            leg.origin.latitude(),
            leg.origin.longitude(),
            options.minute_decimals
        )
    );
    let _ = writeln!(
        out,
        "\tEnd:      {}",
        format_position(
            leg.destination.latitude(),
            leg.destination.longitude(),
            options.minute_decimals
        )
    );
    let _ = writeln!(
        out,
        "\tBearing:  {}° (T)  {}° (M)",
        display_bearing(leg.true_bearing_deg),
        display_bearing(leg.magnetic_bearing_deg)
    );
    if options.show_declination {
        let declination = (leg.declination_deg * 10.0).round() / 10.0;
        let side = if declination < 0.0 { 'W' } else { 'E' };
        let _ = writeln!(out, "\tDeclination: {:.1}°{side}", declination.abs());
    }
    let _ = writeln!(
        out,
        "\tDistance: {:.1} nm",
        display_distance_nm(leg.distance_m, options.meters_per_nautical_mile)
    );
    out
}

/// Render all legs, followed by the total distance when `show_total` is set
///
/// An empty slice renders as an empty string.
pub fn render_report(legs: &[LegResult], options: &ReportOptions) -> String {
    let mut out: String = legs.iter().map(|leg| format_leg(leg, options)).collect();
    if legs.is_empty() || !options.show_total {
        return out;
    }

    let total_m: f64 = legs.iter().map(|leg| leg.distance_m).sum();
    let _ = writeln!(
        out,
        "Total: {} {}, {:.1} nm",
        legs.len(),
        if legs.len() == 1 { "leg" } else { "legs" },
        display_distance_nm(total_m, options.meters_per_nautical_mile)
    );
    out
}

/// Write the rendered report to `writer`
pub fn write_report<W: Write>(
    mut writer: W,
    legs: &[LegResult],
    options: &ReportOptions,
) -> Result<()> {
    writer.write_all(render_report(legs, options).as_bytes())?;
    writer.flush()?;
    Ok(())
}
