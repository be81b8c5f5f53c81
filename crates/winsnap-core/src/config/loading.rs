//! Configuration loading and merging logic.

use crate::config::defaults::default_config_path;
use crate::config::types::{HyprlandConfig, RestoreConfig, StorageConfig, WinsnapConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;

/// Load configuration from the defaults and the user config file.
///
/// A missing config file is not an error. Parse and validation failures are.
pub fn load_hierarchy() -> Result<WinsnapConfig, ConfigError> {
    let mut config = WinsnapConfig::default();

    if let Some(path) = default_config_path() {
        match load_config_file(&path) {
            Ok(user_config) => config = merge_configs(config, user_config),
            Err(ConfigError::ConfigNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load an explicitly named config file. Unlike the hierarchy, the file must exist.
pub fn load_from_path(path: &Path) -> Result<WinsnapConfig, ConfigError> {
    let config = merge_configs(WinsnapConfig::default(), load_config_file(path)?);
    validate_config(&config)?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<WinsnapConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are replaced only when the override sets them.
pub fn merge_configs(base: WinsnapConfig, override_config: WinsnapConfig) -> WinsnapConfig {
    WinsnapConfig {
        storage: StorageConfig {
            sessions_dir: override_config
                .storage
                .sessions_dir
                .or(base.storage.sessions_dir),
        },
        restore: RestoreConfig {
            poll_interval_ms: override_config
                .restore
                .poll_interval_ms
                .or(base.restore.poll_interval_ms),
            window_timeout_ms: override_config
                .restore
                .window_timeout_ms
                .or(base.restore.window_timeout_ms),
            restore_geometry: override_config.restore.restore_geometry
                || base.restore.restore_geometry,
            application_dirs: override_config
                .restore
                .application_dirs
                .or(base.restore.application_dirs),
        },
        hyprland: HyprlandConfig {
            workspace_limit: override_config
                .hyprland
                .workspace_limit
                .or(base.hyprland.workspace_limit),
        },
    }
}
