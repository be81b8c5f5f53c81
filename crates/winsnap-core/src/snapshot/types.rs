use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::host::{Geometry, MonitorInfo, WindowState};
use crate::windows::Fingerprint;

/// A named, timestamped capture of the desktop layout.
///
/// Loaded snapshots are treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub monitors: Vec<MonitorInfo>,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
}

/// One captured window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub fingerprint: Fingerprint,
    #[serde(default)]
    pub monitor: i32,
    /// `None` for windows shown on every workspace.
    #[serde(default)]
    pub workspace: Option<u32>,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub state: WindowState,
}

/// A stored snapshot file as returned by listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub name: String,
    pub filename: String,
    pub path: PathBuf,
}
