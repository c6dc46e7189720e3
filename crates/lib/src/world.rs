//! Placement output boundary.
//!
//! The renderer owns the actual objects; this side only asks for them to be
//! created, moved onto their anchor, and destroyed.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::geometry::Pose;

/// Opaque handle to a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectHandle(pub u64);

impl fmt::Display for ObjectHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "object#{}", self.0)
  }
}

pub trait World {
  /// Instantiate the placed-object prefab at `pose`.
  fn instantiate(&mut self, pose: Pose) -> ObjectHandle;

  /// Move an object, e.g. onto the pose of the anchor it was bound to.
  fn set_pose(&mut self, object: ObjectHandle, pose: Pose);

  fn destroy(&mut self, object: ObjectHandle);
}

/// In-memory scene of placed objects.
#[derive(Debug, Default)]
pub struct SceneWorld {
  next_id: u64,
  objects: BTreeMap<ObjectHandle, Pose>,
  destroyed: usize,
}

impl SceneWorld {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.objects.len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  pub fn pose(&self, object: ObjectHandle) -> Option<Pose> {
    self.objects.get(&object).copied()
  }

  pub fn contains(&self, object: ObjectHandle) -> bool {
    self.objects.contains_key(&object)
  }

  /// Total objects ever instantiated, including destroyed ones.
  pub fn instantiated_count(&self) -> u64 {
    self.next_id
  }

  pub fn destroyed_count(&self) -> usize {
    self.destroyed
  }
}

impl World for SceneWorld {
  fn instantiate(&mut self, pose: Pose) -> ObjectHandle {
    self.next_id += 1;
    let handle = ObjectHandle(self.next_id);
    self.objects.insert(handle, pose);
    debug!(object = %handle, position = %pose.position, "object instantiated");
    handle
  }

  fn set_pose(&mut self, object: ObjectHandle, pose: Pose) {
    if let Some(current) = self.objects.get_mut(&object) {
      *current = pose;
    }
  }

  fn destroy(&mut self, object: ObjectHandle) {
    if self.objects.remove(&object).is_some() {
      self.destroyed += 1;
      debug!(object = %object, "object destroyed");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geometry::{Quat, Vec3};

  #[test]
  fn handles_are_unique_and_destroy_is_tracked() {
    let mut world = SceneWorld::new();
    let a = world.instantiate(Pose::IDENTITY);
    let b = world.instantiate(Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY));
    assert_ne!(a, b);
    assert_eq!(world.len(), 2);

    world.destroy(a);
    world.destroy(a);
    assert_eq!(world.len(), 1);
    assert_eq!(world.destroyed_count(), 1);
    assert_eq!(world.instantiated_count(), 2);
  }

  #[test]
  fn set_pose_ignores_unknown_objects() {
    let mut world = SceneWorld::new();
    world.set_pose(ObjectHandle(9), Pose::IDENTITY);
    assert!(world.is_empty());
  }
}
