//! CLI smoke tests for qranchor.
//!
//! Every test runs the binary against its own temp data directory, so runs
//! share no state and need no serialization.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct Device {
  temp: TempDir,
}

impl Device {
  fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// A Command for the qranchor binary bound to this device's data dir.
  fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("qranchor");
    cmd
      .env("QRANCHOR_DATA_DIR", self.temp.path().join("data"))
      .env("QRANCHOR_CONFIG", self.temp.path().join("missing-config.json"))
      .env_remove("RUST_LOG");
    cmd
  }

  fn json(&self, args: &[&str]) -> Value {
    let output = self.cmd().args(["-o", "json"]).args(args).output().unwrap();
    assert!(output.status.success(), "qranchor {:?} failed", args);
    serde_json::from_slice(&output.stdout).unwrap()
  }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_lists_commands() {
  Device::new()
    .cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("reconcile"))
    .stdout(predicate::str::contains("detect"))
    .stdout(predicate::str::contains("despawn"));
}

#[test]
fn version_flag_works() {
  Device::new()
    .cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("qranchor"));
}

// =============================================================================
// Mappings & Info
// =============================================================================

#[test]
fn mappings_on_fresh_device_is_empty() {
  Device::new()
    .cmd()
    .arg("mappings")
    .assert()
    .success()
    .stdout(predicate::str::contains("No saved mappings."));
}

#[test]
fn mappings_lists_padded_uuid_in_canonical_form() {
  let device = Device::new();
  let data_dir = device.temp.path().join("data");
  std::fs::create_dir_all(&data_dir).unwrap();
  let blob = serde_json::json!({
    "mappings": [{ "qrText": "door-1", "uuid": "\u{3000}\u{3000}\u{3000}0b7e8c1a-2f43-4c55-9a4e-3f1d2c6b8a90" }]
  });
  let prefs = serde_json::json!({ "AnchorMappings": blob.to_string() });
  std::fs::write(data_dir.join("prefs.json"), prefs.to_string()).unwrap();

  device
    .cmd()
    .arg("mappings")
    .assert()
    .success()
    .stdout(predicate::str::contains("door-1"))
    .stdout(predicate::str::contains("0b7e8c1a"));
}

#[test]
fn info_reports_data_dir_from_env() {
  let device = Device::new();
  let info = device.json(&["info"]);

  let data_dir = device.temp.path().join("data");
  assert_eq!(info["data_dir"], data_dir.display().to_string());
  assert_eq!(info["erase_mode"], "fire_and_forget");
  assert_eq!(info["camera"], "1280x960");
}

#[test]
fn data_dir_flag_overrides_env() {
  let device = Device::new();
  let other = device.temp.path().join("other");
  let info = device.json(&["--data-dir", other.to_str().unwrap(), "info"]);
  assert_eq!(info["data_dir"], other.display().to_string());
}

#[test]
fn invalid_config_fails() {
  let device = Device::new();
  let config = device.temp.path().join("config.json");
  std::fs::write(&config, r#"{ "erase_mode": "later" }"#).unwrap();

  device
    .cmd()
    .args(["--config", config.to_str().unwrap(), "info"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load config"));
}

// =============================================================================
// Detect
// =============================================================================

#[test]
fn detect_places_and_persists() {
  let device = Device::new();

  device
    .cmd()
    .args(["detect", "door-1", "--hit", "1,0,2"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Placed and anchored 'door-1'"));

  let list = device.json(&["mappings"]);
  let mappings = list["mappings"].as_array().unwrap();
  assert_eq!(mappings.len(), 1);
  assert_eq!(mappings[0]["qrText"], "door-1");
}

#[test]
fn detect_after_restart_skips_restored_code() {
  let device = Device::new();
  device.json(&["detect", "door-1"]);

  let second = device.json(&["detect", "door-1"]);
  assert_eq!(second["restored"], serde_json::json!(["door-1"]));
  assert_eq!(second["tick"]["skipped_known"], 1);
  assert_eq!(second["state"], "seen_bound");

  let list = device.json(&["mappings"]);
  assert_eq!(list["mappings"].as_array().unwrap().len(), 1);
}

#[test]
fn detect_miss_places_nothing() {
  let device = Device::new();

  let out = device.json(&["detect", "door-1", "--miss"]);
  assert_eq!(out["tick"]["skipped_miss"], 1);
  assert_eq!(out["state"], "unseen");

  let list = device.json(&["mappings"]);
  assert!(list["mappings"].as_array().unwrap().is_empty());
}

#[test]
fn detect_with_too_few_corners_is_malformed() {
  let device = Device::new();
  let out = device.json(&["detect", "door-1", "--corners", "3"]);
  assert_eq!(out["tick"]["skipped_malformed"], 1);
  assert_eq!(out["state"], "unseen");
}

#[test]
fn detect_save_failure_leaves_unbound_object() {
  let device = Device::new();

  device
    .cmd()
    .args(["detect", "door-1", "--fail-save"])
    .assert()
    .success()
    .stdout(predicate::str::contains("anchor save failed"));

  let list = device.json(&["mappings"]);
  assert!(list["mappings"].as_array().unwrap().is_empty());
}

#[test]
fn detect_rejects_bad_hit_point() {
  Device::new()
    .cmd()
    .args(["detect", "door-1", "--hit", "1,2"])
    .assert()
    .failure();
}

// =============================================================================
// Reconcile & Despawn
// =============================================================================

#[test]
fn reconcile_restores_saved_codes() {
  let device = Device::new();
  device.json(&["detect", "door-1"]);
  device.json(&["detect", "door-2"]);

  let report = device.json(&["reconcile"]);
  assert_eq!(report["persisted"], 2);
  assert_eq!(report["loaded"], 2);
  let mut bound: Vec<String> = report["bound"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap().to_string())
    .collect();
  bound.sort();
  assert_eq!(bound, ["door-1", "door-2"]);
}

#[test]
fn reconcile_load_failure_restores_nothing() {
  let device = Device::new();
  device.json(&["detect", "door-1"]);

  let report = device.json(&["reconcile", "--fail-load"]);
  assert_eq!(report["load_failed"], true);
  assert!(report["bound"].as_array().unwrap().is_empty());
}

#[test]
fn reconcile_skips_unlocalizable_anchor() {
  let device = Device::new();
  device.json(&["detect", "door-1"]);
  device.json(&["detect", "door-2"]);

  let list = device.json(&["mappings"]);
  let door_1 = list["mappings"][0]["uuid"].as_str().unwrap().to_string();

  let report = device.json(&["reconcile", "--unlocalizable", &door_1]);
  assert_eq!(report["localization_failures"], 1);
  assert_eq!(report["bound"], serde_json::json!(["door-2"]));
}

#[test]
fn reconcile_rejects_invalid_uuid_flag() {
  Device::new()
    .cmd()
    .args(["reconcile", "--unlocalizable", "not-a-uuid"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a valid anchor uuid"));
}

#[test]
fn despawn_erases_anchor_but_keeps_mapping() {
  let device = Device::new();
  device.json(&["detect", "door-1"]);

  device
    .cmd()
    .args(["despawn", "door-1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Despawned 'door-1'"));

  let report = device.json(&["reconcile"]);
  assert_eq!(report["persisted"], 1);
  assert_eq!(report["loaded"], 0);
  assert!(report["bound"].as_array().unwrap().is_empty());
}

#[test]
fn despawn_with_awaited_erase_reports_erased_anchor() {
  let device = Device::new();
  let config = device.temp.path().join("config.json");
  std::fs::write(&config, r#"{ "erase_mode": "await_logged" }"#).unwrap();
  device.json(&["detect", "door-1"]);

  let out = device.json(&["--config", config.to_str().unwrap(), "despawn", "door-1"]);
  assert_eq!(out["despawned"], true);
  assert_eq!(out["anchor_state"], "erased");
}

#[test]
fn despawn_unknown_code_is_a_no_op() {
  let device = Device::new();
  let out = device.json(&["despawn", "door-9"]);
  assert_eq!(out["despawned"], false);
  assert_eq!(out["anchor_state"], Value::Null);
}
