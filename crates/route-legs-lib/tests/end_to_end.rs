//! Whole-pipeline checks: table text in, report text out

use route_legs_lib::report::{ReportOptions, render_report};
use route_legs_lib::source::read_csv;
use route_legs_lib::{
    Epoch, FixedDeclination, PlannerConfig, RoutePlanner, RouteError, Wgs84Geodesic,
    WorldMagneticModel,
};

const PACIFIC_ROUTE: &str = "\
name, latitude, longitude
Golden Gate, 37.8199, -122.4783
San Diego, 32.7157, -117.1611
Honolulu, 21.3069, -157.8583
";

fn wmm_planner() -> RoutePlanner<Wgs84Geodesic, WorldMagneticModel> {
    RoutePlanner::new(
        PlannerConfig::default(),
        Wgs84Geodesic,
        WorldMagneticModel::wmm2020().unwrap(),
    )
}

#[test]
fn test_three_waypoint_route() {
    let route = read_csv(PACIFIC_ROUTE.as_bytes()).unwrap();
    let epoch = Epoch::parse("2024-06-15").unwrap();
    let legs = wmm_planner().compute_route(route.waypoints(), epoch).unwrap();

    assert_eq!(legs.len(), 2);
    for leg in &legs {
        assert!(leg.distance_m > 0.0);
        assert!((0.0..360.0).contains(&leg.true_bearing_deg));
        assert!((0.0..360.0).contains(&leg.magnetic_bearing_deg));
    }
    assert_eq!(legs[0].destination, legs[1].origin);
    assert_eq!(legs[0].origin.name(), "Golden Gate");
    assert_eq!(legs[1].destination.name(), "Honolulu");

    // Reference values from an independent WGS84 inverse and WMM2020 evaluation
    assert!((legs[0].true_bearing_deg - 137.924).abs() < 0.01);
    assert!((legs[0].distance_m - 744_521.76).abs() < 0.5);
    assert!((legs[0].declination_deg - 13.051).abs() < 0.01);
    assert!((legs[1].true_bearing_deg - 262.954).abs() < 0.01);
    assert!((legs[1].distance_m - 4_203_301.51).abs() < 0.5);
    assert!((legs[1].declination_deg - 10.979).abs() < 0.01);
}

#[test]
fn test_three_waypoint_report() {
    let route = read_csv(PACIFIC_ROUTE.as_bytes()).unwrap();
    let epoch = Epoch::parse("2024-06-15").unwrap();
    let legs = wmm_planner().compute_route(route.waypoints(), epoch).unwrap();
    let text = render_report(&legs, &ReportOptions::default());

    let expected = "\
Leg 0: from Golden Gate to San Diego
\tStart:    37°49.194'N 122°28.698'W
\tEnd:      32°42.942'N 117°09.666'W
\tBearing:  138° (T)  125° (M)
\tDistance: 402.0 nm
Leg 1: from San Diego to Honolulu
\tStart:    32°42.942'N 117°09.666'W
\tEnd:      21°18.414'N 157°51.498'W
\tBearing:  263° (T)  252° (M)
\tDistance: 2269.6 nm
";
    assert_eq!(text, expected);

    let options = ReportOptions {
        show_total: true,
        ..Default::default()
    };
    let with_total = render_report(&legs, &options);
    assert_eq!(with_total, format!("{expected}Total: 2 legs, 2671.6 nm\n"));
}

#[test]
fn test_fixed_declination_route() {
    let route = read_csv(PACIFIC_ROUTE.as_bytes()).unwrap();
    let planner = RoutePlanner::new(
        PlannerConfig::default(),
        Wgs84Geodesic,
        FixedDeclination(-20.0),
    );
    // Any date works without a time-bounded model
    let epoch = Epoch::parse("1950-01-01").unwrap();
    let legs = planner.compute_route(route.waypoints(), epoch).unwrap();
    for leg in legs {
        let expected = (leg.true_bearing_deg + 20.0).rem_euclid(360.0);
        assert!((leg.magnetic_bearing_deg - expected).abs() < 1e-9);
    }
}

#[test]
fn test_single_waypoint_has_no_legs() {
    let route = read_csv("Solo, 10, 10\n".as_bytes()).unwrap();
    let epoch = Epoch::parse("2022-01-01").unwrap();
    let legs = wmm_planner().compute_route(route.waypoints(), epoch).unwrap();
    assert!(legs.is_empty());
    assert_eq!(render_report(&legs, &ReportOptions::default()), "");
}

#[test]
fn test_date_outside_model_fails() {
    let route = read_csv(PACIFIC_ROUTE.as_bytes()).unwrap();
    let epoch = Epoch::parse("2030-06-15").unwrap();
    let err = wmm_planner()
        .compute_route(route.waypoints(), epoch)
        .unwrap_err();
    assert!(matches!(err, RouteError::ModelDomain(_)));
    assert!(!err.is_input_error());
}
