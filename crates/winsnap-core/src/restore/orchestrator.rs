//! Snapshot restore.
//!
//! Windows are handled strictly in snapshot order and one at a time: reuse a
//! live match, else launch the application and poll the registry until its
//! window shows up, then move it to the recorded workspace.

use std::collections::HashSet;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::desktop::DescriptorResolver;
use super::launcher::{LaunchPlan, gio_available};
use super::types::{RestoreOutcome, RestoreReport, RestoreSettings, WindowOutcome};
use crate::host::{WindowHandle, WindowSystem};
use crate::process::ProcessSpawner;
use crate::snapshot::{Snapshot, WindowRecord};
use crate::windows::{Fingerprint, WindowRegistry};

const REASON_CANCELLED: &str = "cancelled";

enum WaitResult {
    Found(WindowHandle),
    TimedOut,
    Cancelled,
}

/// Rebuilds a snapshot's layout against the live registry.
pub struct RestoreOrchestrator<'a> {
    registry: &'a WindowRegistry,
    host: &'a dyn WindowSystem,
    spawner: &'a dyn ProcessSpawner,
    resolver: DescriptorResolver,
    settings: RestoreSettings,
    gio_available: bool,
}

impl<'a> RestoreOrchestrator<'a> {
    pub fn new(
        registry: &'a WindowRegistry,
        host: &'a dyn WindowSystem,
        spawner: &'a dyn ProcessSpawner,
        settings: RestoreSettings,
    ) -> Self {
        Self {
            registry,
            host,
            spawner,
            resolver: DescriptorResolver::new(settings.application_dirs.clone()),
            settings,
            gio_available: gio_available(),
        }
    }

    /// Override the `gio` lookup done at construction.
    pub fn with_gio_available(mut self, available: bool) -> Self {
        self.gio_available = available;
        self
    }

    /// Restore every window of `snapshot`.
    ///
    /// Never fails as a whole; each window gets its own outcome. Once
    /// `cancel` fires, the remaining windows are skipped without touching
    /// the host.
    pub async fn restore(&self, snapshot: &Snapshot, cancel: &CancellationToken) -> RestoreReport {
        info!(
            event = "core.restore.started",
            session = %snapshot.name,
            windows = snapshot.windows.len()
        );

        let mut report = RestoreReport::new(snapshot.name.clone());
        // Windows already placed in this run are not handed to a later record.
        let mut claimed = HashSet::new();

        for record in &snapshot.windows {
            let (outcome, reason) = if cancel.is_cancelled() {
                (RestoreOutcome::Skipped, Some(REASON_CANCELLED.to_string()))
            } else {
                self.restore_window(record, &mut claimed, cancel).await
            };

            let fingerprint = &record.fingerprint;
            info!(
                event = "core.restore.window_completed",
                title = fingerprint.title(),
                wm_class = fingerprint.wm_class(),
                outcome = %outcome,
                reason = reason.as_deref().unwrap_or("")
            );

            report.outcomes.push(WindowOutcome {
                title: fingerprint.title().to_string(),
                wm_class: fingerprint.wm_class().to_string(),
                outcome,
                reason,
            });
        }

        info!(
            event = "core.restore.completed",
            session = %snapshot.name,
            restored = report.success_count(),
            total = report.len()
        );
        report
    }

    async fn restore_window(
        &self,
        record: &WindowRecord,
        claimed: &mut HashSet<WindowHandle>,
        cancel: &CancellationToken,
    ) -> (RestoreOutcome, Option<String>) {
        let fingerprint = &record.fingerprint;

        let Some(command_line) = fingerprint.command_line() else {
            return (
                RestoreOutcome::Skipped,
                Some("no command line recorded".to_string()),
            );
        };

        let (handle, outcome) = match self.find_unclaimed(fingerprint, claimed) {
            Some(handle) => {
                info!(
                    event = "core.restore.window_reused",
                    window = %handle,
                    title = fingerprint.title()
                );
                (handle, RestoreOutcome::Reused)
            }
            None => {
                let plan = LaunchPlan::choose(
                    self.resolver.find(fingerprint),
                    command_line,
                    self.gio_available,
                );
                info!(
                    event = "core.restore.launch_started",
                    title = fingerprint.title(),
                    plan = %plan
                );

                if let Err(e) = self.spawner.spawn(&plan.argv()) {
                    error!(
                        event = "core.restore.launch_failed",
                        title = fingerprint.title(),
                        error = %e
                    );
                    return (RestoreOutcome::Failed, Some(e.to_string()));
                }

                match self.wait_for_window(fingerprint, claimed, cancel).await {
                    WaitResult::Found(handle) => (handle, RestoreOutcome::Launched),
                    WaitResult::TimedOut => {
                        warn!(
                            event = "core.restore.window_timeout",
                            title = fingerprint.title(),
                            timeout_ms = self.settings.window_timeout.as_millis() as u64
                        );
                        return (
                            RestoreOutcome::Failed,
                            Some("timed out waiting for window".to_string()),
                        );
                    }
                    WaitResult::Cancelled => {
                        return (
                            RestoreOutcome::Failed,
                            Some("cancelled while waiting for window".to_string()),
                        );
                    }
                }
            }
        };

        claimed.insert(handle);
        match self.place_window(handle, record) {
            Ok(()) => (outcome, None),
            Err(reason) => (RestoreOutcome::Failed, Some(reason)),
        }
    }

    fn find_unclaimed(
        &self,
        fingerprint: &Fingerprint,
        claimed: &HashSet<WindowHandle>,
    ) -> Option<WindowHandle> {
        self.registry
            .find_window_by_fingerprint(fingerprint)
            .filter(|handle| !claimed.contains(handle))
    }

    /// Poll the registry until `fingerprint` matches a live window not yet
    /// claimed by this run.
    async fn wait_for_window(
        &self,
        fingerprint: &Fingerprint,
        claimed: &HashSet<WindowHandle>,
        cancel: &CancellationToken,
    ) -> WaitResult {
        let deadline = Instant::now() + self.settings.window_timeout;

        loop {
            if let Some(handle) = self.find_unclaimed(fingerprint, claimed) {
                info!(
                    event = "core.restore.window_appeared",
                    window = %handle,
                    title = fingerprint.title()
                );
                return WaitResult::Found(handle);
            }

            let now = Instant::now();
            if now >= deadline {
                return WaitResult::TimedOut;
            }

            let nap = self.settings.poll_interval.min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => return WaitResult::Cancelled,
                _ = sleep(nap) => {}
            }
        }
    }

    /// Move `handle` to the record's workspace, then optionally re-apply its
    /// frame. Only a failed workspace move is an error.
    fn place_window(&self, handle: WindowHandle, record: &WindowRecord) -> Result<(), String> {
        if let Some(workspace) = record.workspace {
            if self.host.has_workspace(workspace) {
                self.host
                    .move_to_workspace(handle, workspace)
                    .map_err(|e| {
                        error!(
                            event = "core.restore.workspace_move_failed",
                            window = %handle,
                            workspace = workspace,
                            error = %e
                        );
                        e.to_string()
                    })?;
                info!(
                    event = "core.restore.workspace_moved",
                    window = %handle,
                    workspace = workspace
                );
            } else {
                warn!(
                    event = "core.restore.workspace_missing",
                    window = %handle,
                    workspace = workspace,
                    "Recorded workspace does not exist, leaving window in place"
                );
            }
        }

        if self.settings.restore_geometry
            && let Err(e) = self.host.move_resize(handle, record.geometry)
        {
            warn!(
                event = "core.restore.geometry_failed",
                window = %handle,
                error = %e
            );
        }

        Ok(())
    }
}
