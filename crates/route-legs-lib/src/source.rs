//! Route loading from CSV tables and GPX files
//!
//! CSV tables have one waypoint per row: `name, latitude, longitude`. Coordinates may be in any
//! notation [`crate::coord`] accepts. Extra columns are ignored, `#` lines and blank lines are
//! skipped, and a leading header row is detected and dropped.
//!
//! GPX files contribute the points of their first `<rte>`, or the top-level `<wpt>` list when
//! the file has no routes.

use crate::{Result, Route, RouteError, Waypoint, coord};
use std::io::Read;
use std::path::Path;

const LATITUDE_LABELS: &[&str] = &["lat", "latitude"];
const LONGITUDE_LABELS: &[&str] = &["lon", "lng", "long", "longitude"];

/// Load a route, choosing the reader from the file extension (`.gpx`, anything else is CSV)
pub fn load_route<P: AsRef<Path>>(path: P) -> Result<Route> {
    #[cfg(feature = "profiling")]
    profiling::scope!("source::load_route");

    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);

    let is_gpx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));
    let route = if is_gpx {
        read_gpx(reader)?
    } else {
        read_csv(reader)?
    };

    tracing::info!(
        "Loaded {} waypoints from {}",
        route.len(),
        path.display()
    );
    Ok(route)
}

fn is_header(latitude: &str, longitude: &str) -> bool {
    let lat = latitude.to_ascii_lowercase();
    let lon = longitude.to_ascii_lowercase();
    LATITUDE_LABELS.contains(&lat.as_str()) || LONGITUDE_LABELS.contains(&lon.as_str())
}

/// Read a `name, latitude, longitude` table
pub fn read_csv<R: Read>(reader: R) -> Result<Route> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    let mut waypoints = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(row as u64 + 1, |pos| pos.line());

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 3 {
            return Err(RouteError::MalformedRow {
                line,
                reason: format!(
                    "expected name, latitude, longitude but found {} field(s)",
                    record.len()
                ),
            });
        }

        let (name, latitude, longitude) = (&record[0], &record[1], &record[2]);
        if waypoints.is_empty() && is_header(latitude, longitude) {
            tracing::warn!("Skipping header row at line {line}");
            continue;
        }

        let waypoint = Waypoint::new(
            name,
            coord::parse_latitude(latitude)?,
            coord::parse_longitude(longitude)?,
        )
        .map_err(|err| RouteError::MalformedRow {
            line,
            reason: err.to_string(),
        })?;
        tracing::trace!(
            "Waypoint {} at ({}, {})",
            waypoint.name(),
            waypoint.latitude(),
            waypoint.longitude()
        );
        waypoints.push(waypoint);
    }

    Route::new(waypoints)
}

/// Read the first route (or the waypoints) of a GPX document
pub fn read_gpx<R: Read>(reader: R) -> Result<Route> {
    let gpx = gpx::read(reader)?;

    let points = match gpx.routes.first() {
        Some(route) => {
            if gpx.routes.len() > 1 {
                tracing::warn!(
                    "GPX file has {} routes, using the first",
                    gpx.routes.len()
                );
            }
            &route.points
        }
        None => &gpx.waypoints,
    };

    let waypoints = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let name = point
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("WP{}", i + 1), str::to_string);
            let position = point.point();
            Waypoint::new(name, position.y(), position.x())
        })
        .collect::<Result<Vec<_>>>()?;

    Route::new(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GPX_ROUTE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="route-legs" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="0.0" lon="0.0"><name>Ignored</name></wpt>
  <rte>
    <name>Coast</name>
    <rtept lat="37.8199" lon="-122.4783"><name>Golden Gate</name></rtept>
    <rtept lat="32.7157" lon="-117.1611"></rtept>
    <rtept lat="21.3069" lon="-157.8583"><name>Honolulu</name></rtept>
  </rte>
</gpx>
"#;

    const GPX_WAYPOINTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="route-legs" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="51.5" lon="-0.1"><name>London</name></wpt>
  <wpt lat="48.85" lon="2.35"></wpt>
</gpx>
"#;

    #[test]
    fn test_csv_plain() {
        let data = "Golden Gate, 37.8199, -122.4783\nSan Diego, 32.7157, -117.1611\n";
        let route = read_csv(data.as_bytes()).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.waypoints()[0].name(), "Golden Gate");
        assert_eq!(route.waypoints()[1].latitude(), 32.7157);
        assert_eq!(route.waypoints()[1].longitude(), -117.1611);
    }

    #[test]
    fn test_csv_header_comments_and_blank_lines() {
        let data = "name,lat,lon\n# departure\nA, 37°49.194'N, 122°28.698'W\n\nB, 32.7157 N, 117.1611 W, extra\n";
        let route = read_csv(data.as_bytes()).unwrap();
        assert_eq!(route.len(), 2);
        assert!((route.waypoints()[0].latitude() - 37.8199).abs() < 1e-9);
        assert!((route.waypoints()[0].longitude() + 122.4783).abs() < 1e-9);
        assert_eq!(route.waypoints()[1].name(), "B");
    }

    #[test]
    fn test_csv_quoted_names() {
        let data = "\"Point, North\", 10, 20\n";
        let route = read_csv(data.as_bytes()).unwrap();
        assert_eq!(route.waypoints()[0].name(), "Point, North");
    }

    #[test]
    fn test_csv_short_row_reports_line() {
        let data = "A, 10, 20\nB, 11\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RouteError::MalformedRow { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_csv_bad_coordinate() {
        let data = "A, 10, 20\nB, north-ish, 20\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidCoordinate { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_csv_empty_name() {
        let data = ", 10, 20\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RouteError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_csv_empty_table() {
        let err = read_csv("# nothing\n\n".as_bytes()).unwrap_err();
        assert!(matches!(err, RouteError::EmptyRoute));
    }

    #[test]
    fn test_gpx_first_route() {
        let route = read_gpx(GPX_ROUTE.as_bytes()).unwrap();
        let names: Vec<_> = route.waypoints().iter().map(|wp| wp.name()).collect();
        assert_eq!(names, ["Golden Gate", "WP2", "Honolulu"]);
        assert_eq!(route.waypoints()[2].longitude(), -157.8583);
    }

    #[test]
    fn test_gpx_waypoints_fallback() {
        let route = read_gpx(GPX_WAYPOINTS.as_bytes()).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.waypoints()[0].name(), "London");
        assert_eq!(route.waypoints()[1].name(), "WP2");
        assert_eq!(route.waypoints()[1].latitude(), 48.85);
    }

    #[test]
    fn test_gpx_malformed() {
        let err = read_gpx("<gpx><rte>".as_bytes()).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_load_route_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("route.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "A, 1, 2").unwrap();
        writeln!(file, "B, 3, 4").unwrap();
        assert_eq!(load_route(&csv_path).unwrap().len(), 2);

        let gpx_path = dir.path().join("route.GPX");
        std::fs::write(&gpx_path, GPX_ROUTE).unwrap();
        assert_eq!(load_route(&gpx_path).unwrap().len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_route("/nonexistent/route.csv").unwrap_err();
        assert!(matches!(err, RouteError::Io(_)));
    }
}
