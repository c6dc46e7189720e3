//! Local key-value persistence.
//!
//! The anchor mappings live in a small string-keyed store that survives
//! process restarts. Writes are staged with `set_string` and become durable
//! on `save`.

mod file;
mod memory;

use std::io;

use thiserror::Error;

pub use file::FilePrefs;
pub use memory::MemoryPrefs;

/// A durable string-to-string store.
pub trait KeyValueStore {
  fn has_key(&self, key: &str) -> bool;

  /// Returns the staged or persisted value for `key`.
  fn get_string(&self, key: &str) -> Option<String>;

  /// Stages `value` under `key`. Not durable until `save`.
  fn set_string(&mut self, key: &str, value: &str);

  fn delete_key(&mut self, key: &str);

  /// Flushes staged changes to durable storage.
  fn save(&mut self) -> Result<(), PrefsError>;
}

/// Errors that can occur when persisting prefs.
#[derive(Debug, Error)]
pub enum PrefsError {
  /// Failed to read the prefs file.
  #[error("failed to read prefs: {0}")]
  Read(#[source] io::Error),

  /// Failed to write the prefs file.
  #[error("failed to write prefs: {0}")]
  Write(#[source] io::Error),

  /// Failed to create the prefs directory.
  #[error("failed to create prefs directory: {0}")]
  CreateDir(#[source] io::Error),

  /// Failed to serialize prefs.
  #[error("failed to serialize prefs: {0}")]
  Serialize(#[source] serde_json::Error),
}
