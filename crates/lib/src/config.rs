//! User configuration.
//!
//! Read from `{config_dir}/config.json` (or `QRANCHOR_CONFIG`). Every field
//! is optional; a missing file means all defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/qranchor",
//!   "erase_mode": "await_logged",
//!   "operation_timeout_ms": 5000,
//!   "camera": { "width": 1280, "height": 960 }
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::geometry::Resolution;
use crate::manager::{EraseMode, ManagerOptions};
use crate::platform::paths::{self, DATA_DIR_ENV};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
  pub width: u32,
  pub height: u32,
}

impl Default for CameraConfig {
  fn default() -> Self {
    Self {
      width: 1280,
      height: 960,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub data_dir: Option<PathBuf>,
  pub erase_mode: EraseMode,
  pub operation_timeout_ms: Option<u64>,
  pub camera: CameraConfig,
}

impl Config {
  /// Load the config at `path`, falling back to defaults if it does not exist.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Data directory: `QRANCHOR_DATA_DIR`, then `data_dir`, then the platform
  /// default.
  pub fn resolved_data_dir(&self) -> PathBuf {
    if std::env::var_os(DATA_DIR_ENV).is_some() {
      return paths::data_dir();
    }
    self.data_dir.clone().unwrap_or_else(paths::data_dir)
  }

  pub fn resolution(&self) -> Resolution {
    Resolution::new(self.camera.width, self.camera.height)
  }

  pub fn manager_options(&self) -> ManagerOptions {
    ManagerOptions {
      erase_mode: self.erase_mode,
      operation_timeout: self.operation_timeout_ms.map(Duration::from_millis),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  fn missing_file_is_default() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(&temp.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.manager_options(), ManagerOptions::default());
  }

  #[test]
  fn partial_file_fills_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{ "erase_mode": "await_logged", "operation_timeout_ms": 250 }"#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.camera, CameraConfig::default());

    let options = config.manager_options();
    assert_eq!(options.erase_mode, EraseMode::AwaitLogged);
    assert_eq!(options.operation_timeout, Some(Duration::from_millis(250)));
  }

  #[test]
  fn unknown_fields_are_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{ "erase": "now" }"#).unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  #[serial]
  fn env_data_dir_beats_config() {
    let config = Config {
      data_dir: Some(PathBuf::from("/from/config")),
      ..Config::default()
    };

    temp_env::with_var(DATA_DIR_ENV, Some("/from/env"), || {
      assert_eq!(config.resolved_data_dir(), PathBuf::from("/from/env"));
    });
    temp_env::with_var(DATA_DIR_ENV, None::<&str>, || {
      assert_eq!(config.resolved_data_dir(), PathBuf::from("/from/config"));
    });
  }
}
