//! Mapping persistence over a [`KeyValueStore`].
//!
//! The whole [`MappingList`] is one JSON blob under
//! [`ANCHOR_MAPPINGS_KEY`]. Every upsert rewrites the blob in full.
//!
//! # Example Blob
//!
//! ```json
//! {"mappings":[{"qrText":"engineA","uuid":"0b7e8c1a-2f43-4c55-9a4e-3f1d2c6b8a90"}]}
//! ```
//!
//! There is no delete operation. Despawning an object leaves its mapping in
//! place, so the anchor is reloaded on the next start.

use thiserror::Error;
use tracing::{debug, info};

use crate::anchor::AnchorId;
use crate::consts::ANCHOR_MAPPINGS_KEY;
use crate::prefs::{KeyValueStore, PrefsError};

use super::types::{MappingEntry, MappingList};

/// Errors that can occur when writing mappings.
#[derive(Debug, Error)]
pub enum MappingError {
  /// QR payload text is used as the key and must not be empty.
  #[error("qr text must not be empty")]
  EmptyQrText,

  /// Failed to serialize the mapping list.
  #[error("failed to serialize anchor mappings: {0}")]
  Serialize(#[source] serde_json::Error),

  /// The underlying prefs store failed to persist.
  #[error(transparent)]
  Prefs(#[from] PrefsError),
}

/// Durable QR-text to anchor-uuid record.
#[derive(Debug)]
pub struct MappingStore<S> {
  prefs: S,
}

impl<S: KeyValueStore> MappingStore<S> {
  pub fn new(prefs: S) -> Self {
    Self { prefs }
  }

  pub fn prefs(&self) -> &S {
    &self.prefs
  }

  /// Read the persisted mappings.
  ///
  /// Returns an empty list when nothing is stored or the blob cannot be
  /// parsed.
  pub fn load(&self) -> MappingList {
    let Some(json) = self.prefs.get_string(ANCHOR_MAPPINGS_KEY) else {
      return MappingList::default();
    };

    match serde_json::from_str::<Option<MappingList>>(&json) {
      Ok(Some(list)) => list,
      Ok(None) => MappingList::default(),
      Err(e) => {
        debug!(error = %e, "stored anchor mappings are unreadable, treating as empty");
        MappingList::default()
      }
    }
  }

  pub fn lookup(&self, qr_text: &str) -> Option<MappingEntry> {
    self.load().find(qr_text).cloned()
  }

  /// Bind `qr_text` to `anchor_id`, replacing any previous binding, and
  /// persist the whole list.
  pub fn upsert(&mut self, qr_text: &str, anchor_id: &AnchorId) -> Result<(), MappingError> {
    if qr_text.is_empty() {
      return Err(MappingError::EmptyQrText);
    }

    let mut list = self.load();
    let replaced = list.upsert(qr_text, &anchor_id.to_string());

    let json = serde_json::to_string(&list).map_err(MappingError::Serialize)?;
    self.prefs.set_string(ANCHOR_MAPPINGS_KEY, &json);
    self.prefs.save()?;

    info!(
      qr_text = %qr_text,
      uuid = %anchor_id,
      replaced = replaced,
      entry_count = list.len(),
      "anchor mapping saved"
    );
    Ok(())
  }
}
