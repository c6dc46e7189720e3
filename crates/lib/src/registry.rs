//! In-memory record of what is currently placed, keyed by QR text.
//!
//! Not persisted. Rebuilt every start from the mapping store and the anchor
//! service.

use std::collections::HashMap;

use crate::anchor::AnchorHandle;
use crate::world::ObjectHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedObject {
  pub object: ObjectHandle,
  /// `None` while the anchor save is in flight or after it failed.
  pub anchor: Option<AnchorHandle>,
}

impl SpawnedObject {
  pub fn unanchored(object: ObjectHandle) -> Self {
    Self { object, anchor: None }
  }

  pub fn anchored(object: ObjectHandle, anchor: AnchorHandle) -> Self {
    Self {
      object,
      anchor: Some(anchor),
    }
  }
}

#[derive(Debug, Default)]
pub struct SpawnedObjectRegistry {
  entries: HashMap<String, SpawnedObject>,
}

impl SpawnedObjectRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, qr_text: &str) -> bool {
    self.entries.contains_key(qr_text)
  }

  pub fn get(&self, qr_text: &str) -> Option<&SpawnedObject> {
    self.entries.get(qr_text)
  }

  /// Registers `spawned` under `qr_text`, returning whatever was there.
  pub fn insert(&mut self, qr_text: impl Into<String>, spawned: SpawnedObject) -> Option<SpawnedObject> {
    self.entries.insert(qr_text.into(), spawned)
  }

  /// Records the saved anchor for an already registered object.
  ///
  /// Returns `false` if `qr_text` is no longer registered.
  pub fn attach_anchor(&mut self, qr_text: &str, anchor: AnchorHandle) -> bool {
    match self.entries.get_mut(qr_text) {
      Some(entry) => {
        entry.anchor = Some(anchor);
        true
      }
      None => false,
    }
  }

  pub fn remove(&mut self, qr_text: &str) -> Option<SpawnedObject> {
    self.entries.remove(qr_text)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Registered QR texts in sorted order.
  pub fn qr_texts(&self) -> Vec<&str> {
    let mut texts: Vec<&str> = self.entries.keys().map(String::as_str).collect();
    texts.sort_unstable();
    texts
  }
}
