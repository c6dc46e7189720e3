use crate::consts::{ANCHORS_FILENAME, APP_NAME, CONFIG_FILENAME, PREFS_FILENAME};
use std::path::PathBuf;

/// Overrides the data directory (prefs and local anchor store).
pub const DATA_DIR_ENV: &str = "QRANCHOR_DATA_DIR";

/// Overrides the config file path.
pub const CONFIG_ENV: &str = "QRANCHOR_CONFIG";

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir())
    .join(APP_NAME)
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
  let config_home = std::env::var("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".config"));
  config_home.join(APP_NAME)
}

/// Returns the directory for data files for the application.
///
/// `QRANCHOR_DATA_DIR` takes precedence over the platform default.
pub fn data_dir() -> PathBuf {
  if let Ok(path) = std::env::var(DATA_DIR_ENV) {
    return PathBuf::from(path);
  }
  default_data_dir()
}

#[cfg(windows)]
fn default_data_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir())
    .join(APP_NAME)
}

#[cfg(not(windows))]
fn default_data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Path of the config file, honouring `QRANCHOR_CONFIG`.
pub fn config_path() -> PathBuf {
  if let Ok(path) = std::env::var(CONFIG_ENV) {
    return PathBuf::from(path);
  }
  config_dir().join(CONFIG_FILENAME)
}

/// Path of the key-value prefs file inside `data_dir`.
pub fn prefs_path(data_dir: &std::path::Path) -> PathBuf {
  data_dir.join(PREFS_FILENAME)
}

/// Path of the local anchor store inside `data_dir`.
pub fn anchors_path(data_dir: &std::path::Path) -> PathBuf {
  data_dir.join(ANCHORS_FILENAME)
}
