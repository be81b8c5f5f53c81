//! Process-level lifecycle events shared by every command.

use std::path::Path;

use tracing::{error, info};

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown(command: &str, succeeded: bool) {
    info!(
        event = "core.app.shutdown_started",
        command = command,
        succeeded = succeeded
    );
}

/// `source` names where the directory came from: `"cli"` or `"config"`.
pub fn log_sessions_dir_resolved(dir: &Path, source: &str) {
    info!(
        event = "core.app.sessions_dir_resolved",
        sessions_dir = %dir.display(),
        source = source,
        exists = dir.is_dir()
    );
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
