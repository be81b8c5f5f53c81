use chrono::Utc;
use tracing::{info, warn};

use super::errors::SnapshotError;
use super::types::{Snapshot, WindowRecord};
use crate::host::WindowSystem;
use crate::windows::WindowRegistry;

/// Build a snapshot of every tracked window's current placement.
///
/// Geometry, workspace, monitor and state are read live from the host.
/// Windows that disappear between listing and reading are left out.
pub fn capture_snapshot(
    name: &str,
    registry: &WindowRegistry,
    host: &dyn WindowSystem,
) -> Result<Snapshot, SnapshotError> {
    let monitors = host.monitors()?;

    let tracked = registry.all_windows();
    let mut windows = Vec::with_capacity(tracked.len());

    for window in tracked {
        let properties = match host.properties(window.handle) {
            Ok(properties) => properties,
            Err(e) => {
                warn!(
                    event = "core.snapshot.window_vanished",
                    window = %window.handle,
                    title = window.fingerprint.title(),
                    error = %e,
                    "Window disappeared during capture, skipping"
                );
                continue;
            }
        };

        windows.push(WindowRecord {
            fingerprint: window.fingerprint,
            monitor: properties.monitor,
            workspace: properties.workspace,
            geometry: properties.frame,
            state: properties.state,
        });
    }

    info!(
        event = "core.snapshot.capture_completed",
        name = name,
        monitors = monitors.len(),
        windows = windows.len()
    );

    Ok(Snapshot {
        name: name.to_string(),
        timestamp: Utc::now(),
        monitors,
        windows,
    })
}
