//! Configuration type definitions for winsnap.
//!
//! These types are serialized/deserialized from the TOML config file.
//!
//! # Example Configuration
//!
//! ```toml
//! [restore]
//! poll_interval_ms = 250
//! window_timeout_ms = 15000
//! application_dirs = ["/usr/share/applications", "/opt/apps/share/applications"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from `<config_dir>/winsnap/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WinsnapConfig {
    /// Where snapshot documents are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Restore orchestration tuning
    #[serde(default)]
    pub restore: RestoreConfig,

    /// Hyprland backend settings
    #[serde(default)]
    pub hyprland: HyprlandConfig,
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// Directory holding `<name>.json` snapshots.
    /// Default: `<config_dir>/winsnap/sessions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_dir: Option<PathBuf>,
}

/// Restore behaviour.
///
/// Optional fields fall back to the defaults in [`super::defaults`] through
/// the accessor methods.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RestoreConfig {
    /// Interval between registry polls while waiting for a launched window.
    /// Default: 200ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// How long to wait for a launched window before giving up.
    /// Default: 10000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_timeout_ms: Option<u64>,

    /// Re-apply the recorded frame geometry after repositioning.
    #[serde(default)]
    pub restore_geometry: bool,

    /// Application descriptor directories, scanned in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_dirs: Option<Vec<PathBuf>>,
}

/// Hyprland backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HyprlandConfig {
    /// Number of workspaces considered to exist. Hyprland creates workspaces
    /// on demand, so any index below this limit is a valid move target.
    /// Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_limit: Option<u32>,
}
