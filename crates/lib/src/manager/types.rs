//! Types reported and consumed by the anchor manager.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where a QR payload is in its placement lifecycle this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionState {
  /// Nothing is registered for the payload.
  Unseen,
  /// An object is placed but has no saved anchor (save pending or failed).
  SeenUnbound,
  /// An object is placed and bound to a saved anchor.
  SeenBound,
}

/// How despawning treats the anchor erase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseMode {
  /// Spawn the erase and never look at its result.
  #[default]
  FireAndForget,
  /// Await the erase and log a failure.
  AwaitLogged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerOptions {
  pub erase_mode: EraseMode,
  /// Upper bound on each anchor-service call. `None` waits indefinitely.
  pub operation_timeout: Option<Duration>,
}

/// Outcome of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
  pub detections: usize,
  pub spawned: Vec<String>,
  pub anchored: Vec<String>,
  pub skipped_malformed: usize,
  pub skipped_miss: usize,
  pub skipped_known: usize,
  pub save_failures: usize,
  pub scan_failed: bool,
}

/// Outcome of the startup reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
  /// Entries found in the mapping store.
  pub persisted: usize,
  /// Entries whose uuid parsed.
  pub parsed: usize,
  /// Anchors the service returned.
  pub loaded: usize,
  /// QR texts that got a placed, bound object.
  pub bound: Vec<String>,
  pub localization_failures: usize,
  pub load_failed: bool,
}
