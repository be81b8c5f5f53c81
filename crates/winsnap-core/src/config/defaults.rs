//! Default values for configuration types.

use crate::config::types::{HyprlandConfig, RestoreConfig, StorageConfig, WinsnapConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
pub const DEFAULT_WINDOW_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_WORKSPACE_LIMIT: u32 = 10;

/// Application directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "winsnap";

/// System-wide, system-local, then per-user descriptor directories.
pub fn default_application_dirs() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/usr/share/applications"),
        PathBuf::from("/usr/local/share/applications"),
    ];
    if let Some(data_dir) = dirs::data_dir() {
        paths.push(data_dir.join("applications"));
    }
    paths
}

/// `<config_dir>/winsnap/sessions`, or `None` when no config dir can be found.
pub fn default_sessions_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("sessions"))
}

/// `<config_dir>/winsnap/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

impl StorageConfig {
    /// Configured sessions directory, or the platform default.
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.sessions_dir.clone().or_else(default_sessions_dir)
    }
}

impl RestoreConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }

    pub fn window_timeout(&self) -> Duration {
        Duration::from_millis(self.window_timeout_ms.unwrap_or(DEFAULT_WINDOW_TIMEOUT_MS))
    }

    pub fn application_dirs(&self) -> Vec<PathBuf> {
        self.application_dirs
            .clone()
            .unwrap_or_else(default_application_dirs)
    }
}

impl HyprlandConfig {
    pub fn workspace_limit(&self) -> u32 {
        self.workspace_limit.unwrap_or(DEFAULT_WORKSPACE_LIMIT)
    }
}

impl WinsnapConfig {
    pub fn sessions_dir(&self) -> Option<PathBuf> {
        self.storage.sessions_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_defaults() {
        let config = RestoreConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(200));
        assert_eq!(config.window_timeout(), Duration::from_secs(10));
        assert!(!config.restore_geometry);
    }

    #[test]
    fn test_default_application_dirs_priority() {
        let dirs = default_application_dirs();
        assert_eq!(dirs[0], PathBuf::from("/usr/share/applications"));
        assert_eq!(dirs[1], PathBuf::from("/usr/local/share/applications"));
    }

    #[test]
    fn test_configured_application_dirs_replace_defaults() {
        let config = RestoreConfig {
            application_dirs: Some(vec![PathBuf::from("/opt/apps")]),
            ..Default::default()
        };
        assert_eq!(config.application_dirs(), vec![PathBuf::from("/opt/apps")]);
    }

    #[test]
    fn test_sessions_dir_override() {
        let config = WinsnapConfig {
            storage: StorageConfig {
                sessions_dir: Some(PathBuf::from("/tmp/snaps")),
            },
            ..Default::default()
        };
        assert_eq!(config.sessions_dir(), Some(PathBuf::from("/tmp/snaps")));
    }

    #[test]
    fn test_workspace_limit_default() {
        assert_eq!(HyprlandConfig::default().workspace_limit(), 10);
    }
}
