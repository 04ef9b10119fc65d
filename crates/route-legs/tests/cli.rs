use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PACIFIC_ROUTE: &str = "\
# name, latitude, longitude
Golden Gate, 37°49.194'N, 122°28.698'W
San Diego, 32.7157, -117.1611
Honolulu, 21.3069 N, 157.8583 W
";

struct Fixture {
    _tmp: TempDir,
    dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().to_path_buf();
        Self { _tmp: tmp, dir }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }
}

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("route-legs");
    cmd.env_remove("RUST_LOG").env_remove("ROUTE_LEGS_MODEL");
    cmd
}

#[test]
fn prints_one_block_per_leg() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    cmd()
        .arg(&route)
        .arg("2024-06-15")
        .assert()
        .success()
        .stdout(contains("Leg 0: from Golden Gate to San Diego"))
        .stdout(contains("Leg 1: from San Diego to Honolulu"))
        .stdout(contains("\tBearing:  138° (T)  125° (M)\n"))
        .stdout(contains("\tBearing:  263° (T)  252° (M)\n"))
        .stdout(contains("\tDistance: 2269.6 nm\n"))
        .stdout(contains("Leg 2").not())
        .stdout(contains("Total").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn total_line_is_opt_in() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    cmd()
        .arg(&route)
        .arg("2024-06-15")
        .arg("--total")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "\tDistance: 2269.6 nm\nTotal: 2 legs, 2671.6 nm\n",
        ));
}

#[test]
fn parallel_output_matches_sequential() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    let sequential = cmd().arg(&route).arg("2024-06-15").output().unwrap();
    let parallel = cmd()
        .arg(&route)
        .arg("2024-06-15")
        .arg("--parallel")
        .output()
        .unwrap();
    assert!(sequential.status.success());
    assert_eq!(sequential.stdout, parallel.stdout);
}

#[test]
fn json_output() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    let output = cmd()
        .args([route.to_str().unwrap(), "June 15, 2024", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let legs = value["legs"].as_array().unwrap();
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0]["sequence_index"], 0);
    assert_eq!(legs[1]["destination"]["name"], "Honolulu");
    assert_eq!(legs[0]["destination"], legs[1]["origin"]);
    let epoch = value["epoch"].as_f64().unwrap();
    assert!((epoch - 2024.4536).abs() < 1e-4);
}

#[test]
fn gpx_route_with_fixed_declination() {
    let fx = Fixture::new();
    let route = fx.write(
        "route.gpx",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <rtept lat="0.0" lon="0.0"></rtept>
    <rtept lat="1.0" lon="0.0"></rtept>
  </rte>
</gpx>
"#,
    );

    cmd()
        .args([route.to_str().unwrap(), "1999-12-31", "--declination", "-10", "--show-declination"])
        .assert()
        .success()
        .stdout(contains("Leg 0: from WP1 to WP2"))
        .stdout(contains("\tBearing:  0° (T)  10° (M)\n"))
        .stdout(contains("\tDeclination: 10.0°W\n"))
        .stdout(contains("\tDistance: 59.7 nm\n"));
}

#[test]
fn single_waypoint_prints_nothing() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", "Solo, 10, 10\n");

    cmd()
        .arg(&route)
        .arg("2022-01-01")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_arguments_is_usage_error() {
    cmd()
        .arg("route.csv")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(contains("Usage"));
}

#[test]
fn invalid_date_fails_without_report() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    cmd()
        .arg(&route)
        .arg("the day after tomorrow")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("Invalid date"));
}

#[test]
fn malformed_row_fails_without_report() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", "A, 10, 10\nB, 11, 11\nC, 12\n");

    cmd()
        .arg(&route)
        .arg("2022-01-01")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("line 3"));
}

#[test]
fn date_outside_model_fails_unless_extrapolated() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    cmd()
        .arg(&route)
        .arg("2031-01-01")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("domain"));

    cmd()
        .arg(&route)
        .arg("2026-01-01")
        .arg("--extrapolate")
        .assert()
        .success()
        .stdout(contains("Leg 1"))
        .stderr(contains("Extrapolating"));
}

#[test]
fn expired_embedded_model_points_at_model_option() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);

    cmd()
        .arg(&route)
        .arg("2026-10-18")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(contains("WMM-2020 domain"))
        .stderr(contains("--model"));
}

#[test]
fn model_file_from_environment() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);
    let model = fx.write(
        "DIPOLE.COF",
        "    2025.0   DIPOLE   01/01/2025\n  1  0  -30000.0  0.0  0.0  0.0\n999999999999999999999999\n",
    );

    cmd()
        .env("ROUTE_LEGS_MODEL", &model)
        .arg(&route)
        .arg("2026-10-18")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(contains("\"magnetic_model\": \"DIPOLE\""));
}

#[test]
fn custom_model_file() {
    let fx = Fixture::new();
    let route = fx.write("route.csv", PACIFIC_ROUTE);
    let model = fx.write(
        "DIPOLE.COF",
        "    2030.0   DIPOLE   01/01/2030\n  1  0  -30000.0  0.0  0.0  0.0\n999999999999999999999999\n",
    );

    cmd()
        .arg(&route)
        .arg("2031-06-01")
        .arg("--model")
        .arg(&model)
        .assert()
        .success()
        .stdout(contains("\tBearing:  138° (T)  138° (M)\n"));
}
