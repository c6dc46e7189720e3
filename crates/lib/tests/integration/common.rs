//! Shared helpers for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use qranchor_lib::anchor::LocalAnchorService;
use qranchor_lib::detect::{DetectionInputs, FixedRaycaster, ForwardProjector, QrDetection, ScriptedScanner};
use qranchor_lib::geometry::{Resolution, Vec3};
use qranchor_lib::manager::{AnchorManager, ManagerOptions};
use qranchor_lib::mapping::MappingStore;
use qranchor_lib::platform::paths::{anchors_path, prefs_path};
use qranchor_lib::prefs::FilePrefs;
use qranchor_lib::world::SceneWorld;
use tempfile::TempDir;

/// One simulated device: a data directory that outlives sessions.
pub struct Device {
  pub temp: TempDir,
}

pub type Session = AnchorManager<FilePrefs, SceneWorld>;

impl Device {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn data_dir(&self) -> PathBuf {
    self.temp.path().join("data")
  }

  /// Start a session whose scanner replays `frames`.
  pub fn start(&self, frames: Vec<Vec<QrDetection>>) -> (Session, Arc<LocalAnchorService>) {
    let data_dir = self.data_dir();
    let prefs = FilePrefs::open(prefs_path(&data_dir)).unwrap();
    let anchors = Arc::new(LocalAnchorService::open(anchors_path(&data_dir)).unwrap());
    let inputs = DetectionInputs::new(
      ScriptedScanner::with_frames(frames),
      ForwardProjector::new(Resolution::new(1280, 960)),
      FixedRaycaster::hit(Vec3::new(0.5, 1.0, 2.0), Vec3::new(0.0, 0.0, -1.0)),
    );
    let session = AnchorManager::new(
      MappingStore::new(prefs),
      anchors.clone(),
      SceneWorld::new(),
      inputs,
      ManagerOptions::default(),
    );
    (session, anchors)
  }
}

pub fn seen(text: &str) -> QrDetection {
  QrDetection::square(text, 0.5, 0.5, 0.1)
}
