/// Application name used for config and data directories.
pub const APP_NAME: &str = "qranchor";

/// Key under which the QR-text to anchor mappings are persisted.
pub const ANCHOR_MAPPINGS_KEY: &str = "AnchorMappings";

/// Minimum number of corner points a QR detection needs to be placed.
pub const MIN_QR_CORNERS: usize = 4;

/// Key-value persistence file name within the data directory.
pub const PREFS_FILENAME: &str = "prefs.json";

/// Local anchor store file name within the data directory.
pub const ANCHORS_FILENAME: &str = "anchors.json";

/// Config file name within the config directory.
pub const CONFIG_FILENAME: &str = "config.json";
