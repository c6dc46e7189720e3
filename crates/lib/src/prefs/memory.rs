use std::collections::BTreeMap;

use super::{KeyValueStore, PrefsError};

/// In-memory prefs. `save` only counts how often it was called.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
  values: BTreeMap<String, String>,
  saves: usize,
}

impl MemoryPrefs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of successful `save` calls so far.
  pub fn save_count(&self) -> usize {
    self.saves
  }
}

impl KeyValueStore for MemoryPrefs {
  fn has_key(&self, key: &str) -> bool {
    self.values.contains_key(key)
  }

  fn get_string(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set_string(&mut self, key: &str, value: &str) {
    self.values.insert(key.to_string(), value.to_string());
  }

  fn delete_key(&mut self, key: &str) {
    self.values.remove(key);
  }

  fn save(&mut self) -> Result<(), PrefsError> {
    self.saves += 1;
    Ok(())
  }
}
