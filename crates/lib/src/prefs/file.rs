//! JSON-file backed prefs.
//!
//! # Storage Layout
//!
//! ```text
//! {data_dir}/
//! └── prefs.json    # flat object of string keys to string values
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{KeyValueStore, PrefsError};

/// Prefs persisted as a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePrefs {
  path: PathBuf,
  values: BTreeMap<String, String>,
}

impl FilePrefs {
  /// Open the prefs file at `path`.
  ///
  /// A missing file opens as empty. A file that is not a JSON object of
  /// strings also opens as empty; the next `save` replaces it.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
    let path = path.into();

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "prefs file not found, starting empty");
        return Ok(Self {
          path,
          values: BTreeMap::new(),
        });
      }
      Err(e) => return Err(PrefsError::Read(e)),
    };

    let values = match serde_json::from_str::<BTreeMap<String, String>>(&content) {
      Ok(values) => values,
      Err(e) => {
        warn!(path = %path.display(), error = %e, "prefs file is corrupt, starting empty");
        BTreeMap::new()
      }
    };

    debug!(path = %path.display(), keys = values.len(), "prefs loaded");
    Ok(Self { path, values })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl KeyValueStore for FilePrefs {
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

  /// Writes the whole map to a temp file, then renames it into place.
  fn save(&mut self) -> Result<(), PrefsError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).map_err(PrefsError::CreateDir)?;
    }

    let content = serde_json::to_string_pretty(&self.values).map_err(PrefsError::Serialize)?;
    let temp_path = self.path.with_extension("json.tmp");
    fs::write(&temp_path, &content).map_err(PrefsError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(PrefsError::Write)?;

    info!(path = %self.path.display(), keys = self.values.len(), "prefs saved");
    Ok(())
  }
}
