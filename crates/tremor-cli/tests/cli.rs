//! End-to-end tests for the `tremor` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const EVENTS: &str = "\
event_name,date,country,actual,forecast,previous
CPI,2024-01-06,US,3.4,3.2,3.1
NFP,2024-01-04,US,216,170,173
FOMC,2024-03-20,US,,,
";

const PRICES: &str = "\
date,SHY,TLT,SPY
2024-01-01,,,
2024-01-02,82.00,98.00,472.65
2024-01-03,82.10,99.00,468.79
2024-01-04,82.00,98.50,467.28
2024-01-05,82.05,97.00,467.92
2024-01-08,81.95,96.20,474.60
2024-01-09,82.00,96.90,473.88
";

struct Fixture {
    dir: TempDir,
    events: PathBuf,
    prices: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let events = dir.path().join("events.csv");
        let prices = dir.path().join("prices.csv");
        fs::write(&events, EVENTS).unwrap();
        fs::write(&prices, PRICES).unwrap();
        Self { dir, events, prices }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Command isolated from any user configuration.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tremor").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env_remove("TREMOR_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn with_inputs(&self, command: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.arg(command)
            .arg("--events")
            .arg(&self.events)
            .arg("--prices")
            .arg(&self.prices);
        cmd
    }
}

fn config_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_impacts_table() {
    let fx = Fixture::new();
    fx.with_inputs("impacts")
        .args(["--z-window", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Event Impacts"))
        .stdout(predicate::str::contains("2024-01-08"))
        .stdout(predicate::str::contains("bear_steepening"));
}

#[test]
fn test_impacts_json() {
    let fx = Fixture::new();
    let output = fx
        .with_inputs("impacts")
        .args(["--z-window", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    // FOMC is beyond the last price date
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r["event_name"] != "FOMC"));
    let nfp_shy = rows
        .iter()
        .find(|r| r["event_name"] == "NFP" && r["ticker"] == "SHY")
        .unwrap();
    assert_eq!(nfp_shy["t_minus_1"], "2024-01-03");
    assert_eq!(nfp_shy["t_plus_1"], "2024-01-05");
}

#[test]
fn test_impacts_csv_marks_undefined() {
    let fx = Fixture::new();
    fx.with_inputs("impacts")
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("event_name,country,event_date_raw"))
        // default 60-day window has too little history
        .stdout(predicate::str::contains("NaN"));
}

#[test]
fn test_impacts_output_file() {
    let fx = Fixture::new();
    let out = fx.path("impacts.json");
    fx.with_inputs("impacts")
        .args(["--z-window", "2", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 6 rows"));

    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 6);
}

#[test]
fn test_impacts_rejects_small_window() {
    let fx = Fixture::new();
    fx.with_inputs("impacts")
        .args(["--z-window", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("z_window"));
}

#[test]
fn test_missing_event_column_fails() {
    let fx = Fixture::new();
    fs::write(&fx.events, "event_name,date\nCPI,2024-01-06\n").unwrap();
    fx.with_inputs("impacts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Schema error"))
        .stderr(predicate::str::contains("country"));
}

#[test]
fn test_classify() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["classify", "--", "-0.001", "-0.008"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bear steepening"));

    let output = fx
        .cmd()
        .args(["--format", "json", "classify", "0.002", "NaN"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["curve_label"], "unknown");
    assert!(value["long_return"].is_null());
}

#[test]
fn test_reaction_summary() {
    let fx = Fixture::new();
    fx.with_inputs("reaction")
        .args(["--event", "CPI", "--date", "2024-01-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CPI on 2024-01-08 shows a bear steepening curve proxy reaction.",
        ))
        .stdout(predicate::str::contains("- long bonds (TLT): same-day down (-0.82%)"))
        .stdout(predicate::str::contains("2024-01-06"));
}

#[test]
fn test_reaction_json() {
    let fx = Fixture::new();
    let output = fx
        .with_inputs("reaction")
        .args(["--event", "NFP", "--date", "2024-01-04", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["reaction"]["rows"].as_array().unwrap().len(), 3);
    assert_eq!(value["reaction"]["event"]["actual"], 216.0);
    assert!(value["summary"]["headline"].as_str().unwrap().starts_with("NFP on 2024-01-04"));
}

#[test]
fn test_reaction_unknown_pair() {
    let fx = Fixture::new();
    fx.with_inputs("reaction")
        .args(["--event", "CPI", "--date", "2024-01-06"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tremor pairs"));
}

#[test]
fn test_pairs() {
    let fx = Fixture::new();
    let output = fx.with_inputs("pairs").args(["-f", "json"]).output().unwrap();
    let pairs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pairs = pairs.as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["event_name"], "CPI");
    assert_eq!(pairs[0]["curve_label"], "bear_steepening");
    assert_eq!(pairs[1]["event_date_trading"], "2024-01-04");
}

#[test]
fn test_coverage() {
    let fx = Fixture::new();
    fs::write(
        &fx.prices,
        "date,SPY,TLT\n2024-01-02,472.65,\n2024-01-03,468.79,99.0\n",
    )
    .unwrap();
    let output = fx
        .cmd()
        .args(["-f", "json", "coverage", "--prices"])
        .arg(&fx.prices)
        .output()
        .unwrap();
    let coverage: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(coverage[1]["ticker"], "TLT");
    assert_eq!(coverage[1]["missing"], 1);
    assert_eq!(coverage[1]["first_date"], "2024-01-03");
}

#[test]
fn test_window() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["-f", "json", "window", "--events"])
        .arg(&fx.events)
        .output()
        .unwrap();
    let window: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(window["events"], 3);
    assert_eq!(window["start"], "2023-12-25");
    assert_eq!(window["end"], "2024-04-19");

    fx.cmd()
        .arg("window")
        .arg("--events")
        .arg(&fx.events)
        .args(["--lead", "0", "--lag", "0", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start,2024-01-04"))
        .stdout(predicate::str::contains("end,2024-03-20"));
}

#[test]
fn test_window_rejects_oversized_lead() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("window")
        .arg("--events")
        .arg(&fx.events)
        .args(["--lead", "400000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_config_init_validate_show() {
    let fx = Fixture::new();
    let path = fx.path("tremor.toml");

    fx.cmd().args(["config", "init"]).arg(&path).assert().success();
    assert!(path.exists());
    // refuses to overwrite
    fx.cmd().args(["config", "init"]).arg(&path).assert().failure();
    fx.cmd().args(["config", "init", "--force"]).arg(&path).assert().success();

    fx.cmd()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    fx.cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("z_window"))
        .stdout(predicate::str::contains("trailing"));
}

#[test]
fn test_config_validate_lists_problems() {
    let fx = Fixture::new();
    let path = config_file(
        fx.dir.path(),
        "bad.json",
        r#"{"z_window": 1, "short_proxy": "TLT", "long_proxy": "TLT"}"#,
    );
    fx.cmd()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("z_window"))
        .stderr(predicate::str::contains("long_proxy"))
        .stderr(predicate::str::contains("2 problem(s)"));
}

#[test]
fn test_config_file_drives_run() {
    let fx = Fixture::new();
    let path = config_file(fx.dir.path(), "tremor.toml", "z_window = 2\nwindow_alignment = \"inclusive\"\n");
    let output = fx
        .with_inputs("impacts")
        .arg("--config")
        .arg(&path)
        .args(["-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(rows
        .as_array()
        .unwrap()
        .iter()
        .any(|r| !r["same_day_z"].is_null()));
}

#[test]
fn test_missing_config_file_fails() {
    let fx = Fixture::new();
    fx.with_inputs("impacts")
        .arg("--config")
        .arg(fx.path("nope.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}
