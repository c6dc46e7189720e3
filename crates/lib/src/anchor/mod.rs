//! Spatial anchor service boundary.
//!
//! The platform owns anchors; this crate only holds their identifiers and
//! binding state. Every call that may touch platform storage is async.

mod local;
mod types;

use async_trait::async_trait;

use crate::geometry::Pose;
use crate::world::ObjectHandle;

pub use local::LocalAnchorService;
pub use types::{AnchorError, AnchorHandle, AnchorId, AnchorOperation, AnchorStatus, BindingState, UnboundAnchor};

#[async_trait]
pub trait AnchorService: Send + Sync {
  /// Create an anchor at `pose` and persist it durably.
  async fn create_and_save(&self, pose: Pose) -> Result<AnchorHandle, AnchorError>;

  /// Load anchors by id. Ids the platform does not know are omitted from the
  /// result rather than reported individually.
  async fn load_unbound(&self, ids: &[AnchorId]) -> Result<Vec<UnboundAnchor>, AnchorError>;

  /// Resolve `anchor` to a current world pose. `false` means localization
  /// failed for this session.
  async fn localize(&self, anchor: &mut UnboundAnchor) -> bool;

  /// Attach a localized anchor to a placed object. Idempotent per anchor.
  fn bind(&self, anchor: UnboundAnchor, target: ObjectHandle) -> AnchorHandle;

  /// Delete the anchor from platform storage.
  async fn erase(&self, handle: &AnchorHandle) -> Result<(), AnchorError>;
}
