//! In-process anchor service.
//!
//! Stands in for the platform anchor store when running off-device. Anchors
//! are kept in memory and, when opened with a path, mirrored to a JSON file
//! so they survive restarts like platform anchors do.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! └── anchors.json    # { "version": 1, "anchors": { "<uuid>": <pose> } }
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::geometry::Pose;
use crate::world::ObjectHandle;

use super::AnchorService;
use super::types::{AnchorError, AnchorHandle, AnchorId, AnchorOperation, AnchorStatus, BindingState, UnboundAnchor};

const ANCHOR_FILE_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnchorFile {
  version: u32,
  anchors: BTreeMap<AnchorId, Pose>,
}

#[derive(Debug, Default)]
struct LocalState {
  anchors: BTreeMap<AnchorId, Pose>,
  bound: HashMap<AnchorId, ObjectHandle>,
  fail_save: bool,
  fail_load: bool,
  fail_erase: bool,
  unlocalizable: HashSet<AnchorId>,
}

/// Anchor store that lives in this process.
#[derive(Debug, Default)]
pub struct LocalAnchorService {
  path: Option<PathBuf>,
  state: Mutex<LocalState>,
}

impl LocalAnchorService {
  /// Purely in-memory store.
  pub fn in_memory() -> Self {
    Self::default()
  }

  /// Store mirrored to `path`. A missing file opens empty; an unreadable or
  /// incompatible one opens empty with a warning.
  pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
    let path = path.into();
    let anchors = match fs::read_to_string(&path) {
      Ok(content) => match serde_json::from_str::<AnchorFile>(&content) {
        Ok(file) if file.version == ANCHOR_FILE_VERSION => file.anchors,
        Ok(file) => {
          warn!(path = %path.display(), version = file.version, "unsupported anchor file version, starting empty");
          BTreeMap::new()
        }
        Err(e) => {
          warn!(path = %path.display(), error = %e, "anchor file is corrupt, starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => return Err(e),
    };

    debug!(path = %path.display(), anchor_count = anchors.len(), "local anchor store opened");
    Ok(Self {
      path: Some(path),
      state: Mutex::new(LocalState {
        anchors,
        ..LocalState::default()
      }),
    })
  }

  /// Insert an anchor directly, as if saved in an earlier session.
  pub fn insert(&self, id: AnchorId, pose: Pose) {
    self.lock().anchors.insert(id, pose);
  }

  pub fn contains(&self, id: &AnchorId) -> bool {
    self.lock().anchors.contains_key(id)
  }

  pub fn anchor_ids(&self) -> Vec<AnchorId> {
    self.lock().anchors.keys().copied().collect()
  }

  /// Object the anchor is bound to in this session, if any.
  pub fn bound_object(&self, id: &AnchorId) -> Option<ObjectHandle> {
    self.lock().bound.get(id).copied()
  }

  pub fn set_fail_save(&self, fail: bool) {
    self.lock().fail_save = fail;
  }

  pub fn set_fail_load(&self, fail: bool) {
    self.lock().fail_load = fail;
  }

  pub fn set_fail_erase(&self, fail: bool) {
    self.lock().fail_erase = fail;
  }

  /// Make `id` fail localization for the rest of this session.
  pub fn set_unlocalizable(&self, id: AnchorId) {
    self.lock().unlocalizable.insert(id);
  }

  fn lock(&self) -> MutexGuard<'_, LocalState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Write to a temp file, then rename over `path`.
  fn persist(&self, anchors: &BTreeMap<AnchorId, Pose>) -> io::Result<()> {
    let Some(path) = &self.path else {
      return Ok(());
    };
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }

    let file = AnchorFile {
      version: ANCHOR_FILE_VERSION,
      anchors: anchors.clone(),
    };
    let content = serde_json::to_string_pretty(&file).map_err(io::Error::other)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)
  }
}

#[async_trait]
impl AnchorService for LocalAnchorService {
  async fn create_and_save(&self, pose: Pose) -> Result<AnchorHandle, AnchorError> {
    tokio::task::yield_now().await;

    let mut state = self.lock();
    if state.fail_save {
      return Err(AnchorError::new(AnchorOperation::CreateAndSave, AnchorStatus::FAILURE));
    }

    let id = AnchorId::new_v4();
    state.anchors.insert(id, pose);
    if let Err(e) = self.persist(&state.anchors) {
      state.anchors.remove(&id);
      warn!(uuid = %id, error = %e, "failed to persist local anchor");
      return Err(AnchorError::new(AnchorOperation::CreateAndSave, AnchorStatus::STORAGE_FAILURE));
    }

    info!(uuid = %id, position = %pose.position, "local anchor saved");
    Ok(AnchorHandle::new(id, BindingState::Bound))
  }

  async fn load_unbound(&self, ids: &[AnchorId]) -> Result<Vec<UnboundAnchor>, AnchorError> {
    tokio::task::yield_now().await;

    let state = self.lock();
    if state.fail_load {
      return Err(AnchorError::new(AnchorOperation::LoadUnbound, AnchorStatus::FAILURE));
    }

    let mut seen = HashSet::new();
    let found: Vec<UnboundAnchor> = ids
      .iter()
      .filter(|id| state.anchors.contains_key(id) && seen.insert(**id))
      .map(|id| UnboundAnchor::new(*id))
      .collect();

    debug!(requested = ids.len(), found = found.len(), "local anchors loaded");
    Ok(found)
  }

  async fn localize(&self, anchor: &mut UnboundAnchor) -> bool {
    tokio::task::yield_now().await;

    let state = self.lock();
    if state.unlocalizable.contains(&anchor.id) {
      return false;
    }
    match state.anchors.get(&anchor.id) {
      Some(pose) => {
        anchor.pose = Some(*pose);
        true
      }
      None => false,
    }
  }

  fn bind(&self, anchor: UnboundAnchor, target: ObjectHandle) -> AnchorHandle {
    let mut state = self.lock();
    let previous = state.bound.insert(anchor.id, target);
    if previous.is_some_and(|prev| prev != target) {
      debug!(uuid = %anchor.id, object = %target, "anchor rebound to a new object");
    }
    AnchorHandle::new(anchor.id, BindingState::Bound)
  }

  async fn erase(&self, handle: &AnchorHandle) -> Result<(), AnchorError> {
    tokio::task::yield_now().await;

    let mut state = self.lock();
    if state.fail_erase {
      return Err(AnchorError::new(AnchorOperation::Erase, AnchorStatus::FAILURE));
    }
    let Some(pose) = state.anchors.remove(&handle.id) else {
      return Err(AnchorError::new(AnchorOperation::Erase, AnchorStatus::NOT_FOUND));
    };
    state.bound.remove(&handle.id);

    if let Err(e) = self.persist(&state.anchors) {
      state.anchors.insert(handle.id, pose);
      warn!(uuid = %handle.id, error = %e, "failed to persist local anchor erase");
      return Err(AnchorError::new(AnchorOperation::Erase, AnchorStatus::STORAGE_FAILURE));
    }

    info!(uuid = %handle.id, "local anchor erased");
    Ok(())
  }
}
