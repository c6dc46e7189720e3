//! Wiring of a manager session against the local, file-backed collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use qranchor_lib::anchor::LocalAnchorService;
use qranchor_lib::config::Config;
use qranchor_lib::detect::{DetectionInputs, FixedRaycaster, ForwardProjector, ScriptedScanner};
use qranchor_lib::manager::AnchorManager;
use qranchor_lib::mapping::MappingStore;
use qranchor_lib::platform::paths::{anchors_path, prefs_path};
use qranchor_lib::prefs::FilePrefs;
use qranchor_lib::world::SceneWorld;
use tracing::debug;

use crate::output::OutputFormat;

pub type Session = AnchorManager<FilePrefs, SceneWorld>;

/// Settings shared by every command.
pub struct Context {
  pub config_path: PathBuf,
  pub config: Config,
  pub data_dir: PathBuf,
  pub format: OutputFormat,
}

impl Context {
  pub fn open_mappings(&self) -> Result<MappingStore<FilePrefs>> {
    let path = prefs_path(&self.data_dir);
    let prefs = FilePrefs::open(&path).with_context(|| format!("Failed to open prefs at {}", path.display()))?;
    Ok(MappingStore::new(prefs))
  }

  pub fn open_anchors(&self) -> Result<Arc<LocalAnchorService>> {
    let path = anchors_path(&self.data_dir);
    let anchors =
      LocalAnchorService::open(&path).with_context(|| format!("Failed to open anchor store at {}", path.display()))?;
    Ok(Arc::new(anchors))
  }

  /// Build a session whose camera sees what `scanner` replays and whose
  /// environment answers every ray with `raycaster`.
  pub fn session(
    &self,
    anchors: Arc<LocalAnchorService>,
    scanner: ScriptedScanner,
    raycaster: FixedRaycaster,
  ) -> Result<Session> {
    let inputs = DetectionInputs::new(scanner, ForwardProjector::new(self.config.resolution()), raycaster);
    debug!(data_dir = %self.data_dir.display(), options = ?self.config.manager_options(), "opening session");
    Ok(AnchorManager::new(
      self.open_mappings()?,
      anchors,
      SceneWorld::new(),
      inputs,
      self.config.manager_options(),
    ))
  }
}

pub fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")
}
