//! Bearing normalization

/// Full circle in degrees
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Beyond this many turns the fold switches from repeated addition to `rem_euclid`
const MAX_FOLD_TURNS: f64 = 4.0;

/// Fold any azimuth in degrees into `[0, 360)`
///
/// Adds 360 while the value is negative and subtracts 360 while it is at least 360. Values
/// congruent to 0 mod 360 map to `0.0`, never `360.0`. Non-finite input is returned unchanged.
#[inline]
pub fn normalize(azimuth_deg: f64) -> f64 {
    if !azimuth_deg.is_finite() {
        return azimuth_deg;
    }

    let mut value = if azimuth_deg.abs() > MAX_FOLD_TURNS * FULL_CIRCLE_DEG {
        azimuth_deg.rem_euclid(FULL_CIRCLE_DEG)
    } else {
        azimuth_deg
    };

    while value < 0.0 {
        value += FULL_CIRCLE_DEG;
    }
    while value >= FULL_CIRCLE_DEG {
        value -= FULL_CIRCLE_DEG;
    }

    // -0.0 and tiny negatives that round up to 360.0 during the addition
    if value == 0.0 || value >= FULL_CIRCLE_DEG {
        0.0
    } else {
        value
    }
}
