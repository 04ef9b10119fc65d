//! Latitude/longitude text parsing and degree-minute formatting
//!
//! Accepts the formats people type into route tables:
//!
//! - decimal degrees: `37.8199`, `-122.4783`, `37.8199N`, `W 122.4783`
//! - degrees and decimal minutes: `37°49.194'N`, `37 49.194 N`, `122d28.698mW`
//! - degrees, minutes and seconds: `37°49'11.6"N`, `45:30:15 S`, `45d30m15s`
//!
//! The hemisphere letter may prefix or suffix the number, never sit between numbers. `S` and
//! `W` negate the value. A trailing `s` reads as a seconds mark only in the `d`/`m` letter
//! notation; `45 30 15s` is south.

use crate::{Result, RouteError};

/// Most minute decimals the formatter renders; larger requests are clamped
pub const MAX_MINUTE_DECIMALS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    /// (positive, negative) hemisphere letters
    fn hemispheres(self) -> (char, char) {
        match self {
            Axis::Latitude => ('N', 'S'),
            Axis::Longitude => ('E', 'W'),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }
}

/// Parse a latitude in any supported notation to decimal degrees in `[-90, 90]`
pub fn parse_latitude(text: &str) -> Result<f64> {
    parse_axis(text, Axis::Latitude)
}

/// Parse a longitude in any supported notation to decimal degrees in `[-180, 180]`
pub fn parse_longitude(text: &str) -> Result<f64> {
    parse_axis(text, Axis::Longitude)
}

/// Format a latitude as `DD°MM.mmm'H`
pub fn format_latitude_dm(latitude: f64, minute_decimals: usize) -> String {
    format_dm(latitude, minute_decimals, 2, Axis::Latitude)
}

/// Format a longitude as `DDD°MM.mmm'H`
pub fn format_longitude_dm(longitude: f64, minute_decimals: usize) -> String {
    format_dm(longitude, minute_decimals, 3, Axis::Longitude)
}

fn invalid(input: &str, reason: impl Into<String>) -> RouteError {
    RouteError::InvalidCoordinate {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '°' | 'º' | '\'' | '′' | '’' | '"' | '″' | '”' | ':' | 'd' | 'm'
        )
}

fn parse_axis(text: &str, axis: Axis) -> Result<f64> {
    let input = text.trim();
    if input.is_empty() {
        return Err(invalid(text, "empty value"));
    }

    let mut numbers: Vec<f64> = Vec::with_capacity(3);
    let mut hemisphere: Option<char> = None;
    let mut negative = false;
    let mut chars = input.char_indices().peekable();
    let mut after_number = false;
    let mut unit_letters = false;
    let mut letter_after_number = false;

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            if letter_after_number {
                return Err(invalid(
                    text,
                    "hemisphere letter must lead or trail the value",
                ));
            }
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if next.is_ascii_digit() || next == '.' {
                    end = i + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let token = &input[start..end];
            let value: f64 = token
                .parse()
                .map_err(|_| invalid(text, format!("bad number '{token}'")))?;
            numbers.push(value);
            after_number = true;
            continue;
        }

        if c == '-' || c == '+' {
            if !numbers.is_empty() || negative {
                return Err(invalid(text, "misplaced sign"));
            }
            negative = c == '-';
        } else if c == 's' && after_number && numbers.len() == 3 && unit_letters {
            // seconds marker glued to the number, as in 45d30m15s
        } else if is_separator(c) {
            // unit marks and whitespace only delimit numbers
            unit_letters |= c == 'd' || c == 'm';
        } else if c.is_ascii_alphabetic() {
            if hemisphere.is_some() {
                return Err(invalid(text, "more than one hemisphere letter"));
            }
            let letter = c.to_ascii_uppercase();
            let (positive, negative_letter) = axis.hemispheres();
            if letter != positive && letter != negative_letter {
                return Err(invalid(
                    text,
                    format!("'{c}' is not a {} hemisphere", axis.name()),
                ));
            }
            hemisphere = Some(letter);
            letter_after_number = !numbers.is_empty();
        } else {
            return Err(invalid(text, format!("unexpected character '{c}'")));
        }
        after_number = false;
    }

    let value = match numbers.as_slice() {
        [] => return Err(invalid(text, "no numeric value")),
        [degrees] => *degrees,
        [degrees, minutes] => {
            check_whole(text, *degrees, "degrees")?;
            check_sexagesimal(text, *minutes, "minutes")?;
            degrees + minutes / 60.0
        }
        [degrees, minutes, seconds] => {
            check_whole(text, *degrees, "degrees")?;
            check_whole(text, *minutes, "minutes")?;
            check_sexagesimal(text, *minutes, "minutes")?;
            check_sexagesimal(text, *seconds, "seconds")?;
            degrees + minutes / 60.0 + seconds / 3600.0
        }
        _ => return Err(invalid(text, "too many numeric components")),
    };

    let southern_or_western = hemisphere == Some(axis.hemispheres().1);
    if negative && hemisphere.is_some() {
        return Err(invalid(text, "sign conflicts with hemisphere letter"));
    }
    let signed = if negative || southern_or_western {
        -value
    } else {
        value
    };

    if !signed.is_finite() || signed.abs() > axis.limit() {
        return Err(invalid(
            text,
            format!("{} must be within ±{}°", axis.name(), axis.limit()),
        ));
    }

    Ok(signed)
}

fn check_whole(text: &str, value: f64, what: &str) -> Result<()> {
    if value.fract() != 0.0 {
        return Err(invalid(
            text,
            format!("{what} must be whole when followed by smaller units"),
        ));
    }
    Ok(())
}

fn check_sexagesimal(text: &str, value: f64, what: &str) -> Result<()> {
    if !(0.0..60.0).contains(&value) {
        return Err(invalid(text, format!("{what} must be below 60")));
    }
    Ok(())
}

fn format_dm(value: f64, minute_decimals: usize, degree_width: usize, axis: Axis) -> String {
    let minute_decimals = minute_decimals.min(MAX_MINUTE_DECIMALS);
    let scale = 10u64.pow(minute_decimals as u32);
    // Round once on the smallest displayed unit so 59.9996' carries into the degrees
    let total = (value.abs() * 60.0 * scale as f64).round() as u64;
    let degrees = total / (60 * scale);
    let minutes = (total % (60 * scale)) as f64 / scale as f64;

    let (positive, negative) = axis.hemispheres();
    let letter = if value < 0.0 && total > 0 {
        negative
    } else {
        positive
    };

    let minute_width = if minute_decimals == 0 {
        2
    } else {
        3 + minute_decimals
    };
    format!(
        "{degrees:0degree_width$}°{minutes:0minute_width$.minute_decimals$}'{letter}"
    )
}
