//! Configuration validation logic.

use crate::config::types::WinsnapConfig;
use crate::errors::ConfigError;

/// Validate a WinsnapConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `restore.poll_interval_ms` must be greater than zero
/// - `restore.window_timeout_ms` must not be shorter than the poll interval
/// - `hyprland.workspace_limit` must be greater than zero
pub fn validate_config(config: &WinsnapConfig) -> Result<(), ConfigError> {
    let poll = config.restore.poll_interval();
    if poll.is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "restore.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    let timeout = config.restore.window_timeout();
    if timeout < poll {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "restore.window_timeout_ms ({}) is shorter than restore.poll_interval_ms ({})",
                timeout.as_millis(),
                poll.as_millis()
            ),
        });
    }

    if config.hyprland.workspace_limit() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "hyprland.workspace_limit must be greater than 0".to_string(),
        });
    }

    Ok(())
}
