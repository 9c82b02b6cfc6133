use assert_cmd::prelude::*;

use predicates::prelude::*;
use predicates::str::contains;
use std::path::PathBuf;
use std::process::Command;

fn fixture() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ai_adoption_sample.csv")
}

/// Helper to create a Command for the `orbit` binary without color or user config
fn orbit_cmd(workdir: &assert_fs::TempDir) -> Command {
  let mut cmd = Command::cargo_bin("orbit").expect("binary exists");
  cmd.current_dir(workdir.path());
  cmd.env("NO_COLOR", "1");
  cmd.env("XDG_CONFIG_HOME", workdir.path());
  cmd
}

#[test]
fn test_summary_table_and_json() {
  let temp = assert_fs::TempDir::new().unwrap();

  orbit_cmd(&temp)
    .arg("summary")
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("6,575").and(contains("Top tool")));

  orbit_cmd(&temp)
    .args(["summary", "--json", "--year", "2022"])
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("\"totalUsers\": 150").and(contains("\"topCountry\": \"Germany\"")));

  temp.close().unwrap();
}

#[test]
fn test_view_age_groups_in_canonical_order() {
  let temp = assert_fs::TempDir::new().unwrap();

  let output = orbit_cmd(&temp).args(["view", "age-group"]).arg(fixture()).output().unwrap();
  assert!(output.status.success());

  let stdout = String::from_utf8(output.stdout).unwrap();
  let positions: Vec<usize> = ["18-24", "25-34", "35-44", "45-54", "55+"]
    .iter()
    .map(|label| stdout.find(label).expect("age group present"))
    .collect();
  assert!(positions.windows(2).all(|w| w[0] < w[1]));

  temp.close().unwrap();
}

#[test]
fn test_view_filter_without_matches() {
  let temp = assert_fs::TempDir::new().unwrap();

  orbit_cmd(&temp)
    .args(["view", "country", "--year", "1999"])
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("no matching records"));

  orbit_cmd(&temp)
    .args(["view", "tool", "--json", "--country", "Atlantis"])
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("[]"));

  temp.close().unwrap();
}

#[test]
fn test_unknown_dimension_is_rejected() {
  let temp = assert_fs::TempDir::new().unwrap();

  orbit_cmd(&temp)
    .args(["view", "planet"])
    .arg(fixture())
    .assert()
    .failure()
    .stderr(contains("Unknown dimension"));

  temp.close().unwrap();
}

#[test]
fn test_years_and_precompute() {
  let temp = assert_fs::TempDir::new().unwrap();

  orbit_cmd(&temp)
    .arg("years")
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("2022\n2023\n2024"));

  orbit_cmd(&temp)
    .arg("precompute")
    .arg(fixture())
    .args(["--output", "out.json"])
    .assert()
    .success()
    .stdout(contains("3 countries").and(contains("6 raw data records")));

  // The generated document is itself a valid dataset
  orbit_cmd(&temp)
    .args(["view", "year", "out.json"])
    .assert()
    .success()
    .stdout(contains("2023"));

  temp.close().unwrap();
}

#[test]
fn test_missing_dataset_fails() {
  let temp = assert_fs::TempDir::new().unwrap();

  orbit_cmd(&temp)
    .args(["summary", "nowhere.csv"])
    .assert()
    .failure()
    .stderr(contains("Failed to read"));

  temp.close().unwrap();
}

#[test]
fn test_config_switches_statistic() {
  let temp = assert_fs::TempDir::new().unwrap();
  std::fs::write(temp.path().join("orbit.json"), r#"{ "user_statistic": "sum" }"#).unwrap();

  // Sum convention: Retail = 3000 + 975
  orbit_cmd(&temp)
    .args(["view", "industry", "--json"])
    .arg(fixture())
    .assert()
    .success()
    .stdout(contains("\"totalUsers\": 3975.0"));

  temp.close().unwrap();
}

#[test]
fn test_legacy_document_follows_configured_statistic() {
  let temp = assert_fs::TempDir::new().unwrap();
  let document = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/legacy_precomputed_data.json");

  // Stored median views: USA = median(1200, 800)
  orbit_cmd(&temp)
    .args(["view", "country", "--json"])
    .arg(&document)
    .assert()
    .success()
    .stdout(contains("\"totalUsers\": 1000.0"));

  std::fs::write(temp.path().join("orbit.json"), r#"{ "user_statistic": "sum" }"#).unwrap();

  // Rebuilt under the sum convention: USA = 1200 + 800
  orbit_cmd(&temp)
    .args(["view", "country", "--json"])
    .arg(&document)
    .assert()
    .success()
    .stdout(contains("\"totalUsers\": 2000.0"));

  temp.close().unwrap();
}
