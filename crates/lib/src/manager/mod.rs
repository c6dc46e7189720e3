//! QR-to-anchor binding management.
//!
//! [`AnchorManager`] owns the spawned-object registry and the mapping store
//! and drives them from a single control flow:
//!
//! - [`AnchorManager::reconcile`] runs once at startup and rebinds every
//!   persisted anchor the platform can still localize.
//! - [`AnchorManager::tick`] runs one detection pass per frame and places a
//!   new anchored object for each QR payload seen for the first time.
//! - [`AnchorManager::despawn`] removes a placed object and erases its anchor.
//!
//! Anchor handles start `Bound` (saved at placement, or bound on restore) and
//! leave the registry on despawn as `Erased` or `Unbound`.
//!
//! All methods take `&mut self`, so passes never overlap. A detection pass
//! registers the object before suspending on the anchor save; a later pass
//! for the same payload always sees it and skips.

mod types;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::anchor::{
  AnchorError, AnchorHandle, AnchorId, AnchorOperation, AnchorService, AnchorStatus, BindingState, UnboundAnchor,
};
use crate::consts::MIN_QR_CORNERS;
use crate::detect::{DetectionInputs, QrDetection};
use crate::geometry::{Pose, center_uv};
use crate::mapping::MappingStore;
use crate::prefs::KeyValueStore;
use crate::registry::{SpawnedObject, SpawnedObjectRegistry};
use crate::world::World;

pub use types::{DetectionState, EraseMode, ManagerOptions, ReconcileReport, TickReport};

enum Placement {
  Malformed,
  Miss,
  Known,
  Spawned { anchored: bool },
}

pub struct AnchorManager<S, W> {
  mappings: MappingStore<S>,
  anchors: Arc<dyn AnchorService>,
  world: W,
  inputs: DetectionInputs,
  registry: SpawnedObjectRegistry,
  options: ManagerOptions,
  background: JoinSet<()>,
}

impl<S: KeyValueStore, W: World> AnchorManager<S, W> {
  pub fn new(
    mappings: MappingStore<S>,
    anchors: Arc<dyn AnchorService>,
    world: W,
    inputs: DetectionInputs,
    options: ManagerOptions,
  ) -> Self {
    Self {
      mappings,
      anchors,
      world,
      inputs,
      registry: SpawnedObjectRegistry::new(),
      options,
      background: JoinSet::new(),
    }
  }

  pub fn registry(&self) -> &SpawnedObjectRegistry {
    &self.registry
  }

  pub fn mappings(&self) -> &MappingStore<S> {
    &self.mappings
  }

  pub fn world(&self) -> &W {
    &self.world
  }

  pub fn options(&self) -> &ManagerOptions {
    &self.options
  }

  pub fn detection_state(&self, qr_text: &str) -> DetectionState {
    match self.registry.get(qr_text) {
      None => DetectionState::Unseen,
      Some(SpawnedObject { anchor: Some(_), .. }) => DetectionState::SeenBound,
      Some(SpawnedObject { anchor: None, .. }) => DetectionState::SeenUnbound,
    }
  }

  /// Load every persisted mapping, resolve it against the anchor service and
  /// repopulate the registry.
  ///
  /// Unparsable uuids are ignored. A failed bulk load leaves the registry
  /// untouched. An anchor that fails to localize is skipped without
  /// affecting the rest of the batch.
  pub async fn reconcile(&mut self) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let list = self.mappings.load();
    report.persisted = list.len();
    if list.is_empty() {
      info!("no saved anchors found");
      return report;
    }

    let mut ids = Vec::new();
    let mut qr_by_id: HashMap<AnchorId, String> = HashMap::new();
    for entry in &list.mappings {
      let Some(id) = AnchorId::parse(&entry.uuid) else {
        continue;
      };
      report.parsed += 1;
      if qr_by_id.insert(id, entry.qr_text.clone()).is_none() {
        ids.push(id);
      }
    }
    if ids.is_empty() {
      return report;
    }

    let limit = self.options.operation_timeout;
    let unbound = match bounded(limit, AnchorOperation::LoadUnbound, self.anchors.load_unbound(&ids)).await {
      Ok(unbound) => unbound,
      Err(e) => {
        error!(status = %e.status, requested = ids.len(), "failed to load anchors");
        report.load_failed = true;
        return report;
      }
    };
    report.loaded = unbound.len();
    info!(requested = ids.len(), loaded = unbound.len(), "anchors loaded");

    for anchor in unbound {
      let Some(qr_text) = qr_by_id.get(&anchor.id).cloned() else {
        warn!(uuid = %anchor.id, "anchor service returned an anchor that was not requested");
        continue;
      };
      if self.registry.contains(&qr_text) {
        debug!(qr_text = %qr_text, "qr code already placed, skipping saved anchor");
        continue;
      }

      let Some(anchor) = localize(limit, self.anchors.as_ref(), anchor).await else {
        report.localization_failures += 1;
        continue;
      };

      let pose = anchor.pose;
      let object = self.world.instantiate(Pose::IDENTITY);
      let handle = self.anchors.bind(anchor, object);
      if let Some(pose) = pose {
        self.world.set_pose(object, pose);
      }

      info!(qr_text = %qr_text, uuid = %handle.id, object = %object, "loaded and bound anchor for qr code");
      self.registry.insert(qr_text.clone(), SpawnedObject::anchored(object, handle));
      report.bound.push(qr_text);
    }

    report
  }

  /// Run one detection pass over the current camera frame.
  pub async fn tick(&mut self) -> TickReport {
    let mut report = TickReport::default();

    let detections = match self.inputs.scanner.scan_frame().await {
      Ok(detections) => detections,
      Err(e) => {
        debug!(error = %e, "qr scan failed, no detections this frame");
        report.scan_failed = true;
        return report;
      }
    };
    report.detections = detections.len();

    for detection in &detections {
      match self.place(detection).await {
        Placement::Malformed => report.skipped_malformed += 1,
        Placement::Miss => report.skipped_miss += 1,
        Placement::Known => report.skipped_known += 1,
        Placement::Spawned { anchored } => {
          report.spawned.push(detection.text.clone());
          if anchored {
            report.anchored.push(detection.text.clone());
          } else {
            report.save_failures += 1;
          }
        }
      }
    }

    report
  }

  async fn place(&mut self, detection: &QrDetection) -> Placement {
    if detection.text.is_empty() || detection.corners.len() < MIN_QR_CORNERS {
      return Placement::Malformed;
    }
    let Some(uv) = center_uv(&detection.corners) else {
      return Placement::Malformed;
    };

    let projector = &self.inputs.projector;
    let pixel = projector.resolution().to_pixel(uv);
    let ray = projector.screen_point_to_ray(pixel);
    let Some(hit) = self.inputs.raycaster.raycast(&ray) else {
      debug!(qr_text = %detection.text, x = pixel.x, y = pixel.y, "raycast missed, skipping detection");
      return Placement::Miss;
    };

    if self.registry.contains(&detection.text) {
      return Placement::Known;
    }

    let pose = hit.spawn_pose();
    let object = self.world.instantiate(pose);
    self
      .registry
      .insert(detection.text.clone(), SpawnedObject::unanchored(object));
    info!(qr_text = %detection.text, position = %pose.position, object = %object, "spawned object for qr code");

    let limit = self.options.operation_timeout;
    match bounded(limit, AnchorOperation::CreateAndSave, self.anchors.create_and_save(pose)).await {
      Ok(handle) => {
        let id = handle.id;
        info!(qr_text = %detection.text, uuid = %id, "anchor saved");
        self.registry.attach_anchor(&detection.text, handle);
        if let Err(e) = self.mappings.upsert(&detection.text, &id) {
          error!(qr_text = %detection.text, uuid = %id, error = %e, "failed to persist anchor mapping");
        }
        Placement::Spawned { anchored: true }
      }
      Err(e) => {
        error!(qr_text = %detection.text, status = %e.status, "failed to save anchor");
        Placement::Spawned { anchored: false }
      }
    }
  }

  /// Remove the object placed for `qr_text` and erase its anchor.
  ///
  /// Returns the removed record, or `None` if nothing was registered for
  /// `qr_text`. Its anchor handle ends `Erased` once the erase is confirmed
  /// and `Unbound` otherwise: detached from the destroyed object with the
  /// erase still pending (fire-and-forget) or failed. The persisted mapping
  /// is left in place.
  pub async fn despawn(&mut self, qr_text: &str) -> Option<SpawnedObject> {
    let mut spawned = self.registry.remove(qr_text)?;

    if let Some(anchor) = spawned.anchor.as_mut() {
      let state = self.erase(anchor).await;
      anchor.state = state;
    }
    self.world.destroy(spawned.object);

    info!(qr_text = %qr_text, object = %spawned.object, "despawned object for qr code");
    Some(spawned)
  }

  /// Fire-and-forget erases not yet reaped.
  pub fn background_len(&self) -> usize {
    self.background.len()
  }

  /// Wait for fire-and-forget erases still in flight. Their results are
  /// discarded.
  pub async fn drain_background(&mut self) {
    while self.background.join_next().await.is_some() {}
  }

  async fn erase(&mut self, handle: &AnchorHandle) -> BindingState {
    let limit = self.options.operation_timeout;
    match self.options.erase_mode {
      EraseMode::FireAndForget => {
        while self.background.try_join_next().is_some() {}

        let anchors = Arc::clone(&self.anchors);
        let handle = handle.clone();
        match tokio::runtime::Handle::try_current() {
          Ok(runtime) => {
            self.background.spawn_on(
              async move {
                let _ = bounded(limit, AnchorOperation::Erase, anchors.erase(&handle)).await;
              },
              &runtime,
            );
          }
          Err(_) => warn!(uuid = %handle.id, "no async runtime, anchor erase skipped"),
        }
        BindingState::Unbound
      }
      EraseMode::AwaitLogged => match bounded(limit, AnchorOperation::Erase, self.anchors.erase(handle)).await {
        Ok(()) => {
          debug!(uuid = %handle.id, "anchor erased");
          BindingState::Erased
        }
        Err(e) => {
          warn!(uuid = %handle.id, status = %e.status, "failed to erase anchor");
          BindingState::Unbound
        }
      },
    }
  }
}

/// Await an anchor-service call, turning an elapsed `limit` into a
/// `TIMED_OUT` failure of `operation`.
async fn bounded<T>(
  limit: Option<Duration>,
  operation: AnchorOperation,
  call: impl Future<Output = Result<T, AnchorError>>,
) -> Result<T, AnchorError> {
  match limit {
    Some(limit) => tokio::time::timeout(limit, call)
      .await
      .unwrap_or_else(|_| Err(AnchorError::new(operation, AnchorStatus::TIMED_OUT))),
    None => call.await,
  }
}

/// Localize `anchor`, treating an elapsed `limit` as a localization failure.
async fn localize(limit: Option<Duration>, anchors: &dyn AnchorService, mut anchor: UnboundAnchor) -> Option<UnboundAnchor> {
  let localized = match limit {
    Some(limit) => tokio::time::timeout(limit, anchors.localize(&mut anchor))
      .await
      .unwrap_or(false),
    None => anchors.localize(&mut anchor).await,
  };

  if localized {
    Some(anchor)
  } else {
    error!(uuid = %anchor.id, "localization failed for anchor");
    None
  }
}
