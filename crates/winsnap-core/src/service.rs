//! Session save/restore entry points for front ends.
//!
//! [`SnapshotService`] owns the registry for its lifetime: creating it starts
//! window tracking, dropping it (or calling [`SnapshotService::shutdown`])
//! releases every host subscription.

use std::path::PathBuf;
use std::rc::Rc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::WinsnapConfig;
use crate::events;
use crate::host::WindowSystem;
use crate::process::{CommandSpawner, ProcessInspector, ProcessSpawner, SysinfoInspector};
use crate::restore::{RestoreOrchestrator, RestoreReport, RestoreSettings};
use crate::snapshot::{SessionEntry, Snapshot, SnapshotError, SnapshotStore};
use crate::windows::WindowRegistry;

pub struct SnapshotService {
    host: Rc<dyn WindowSystem>,
    registry: WindowRegistry,
    store: SnapshotStore,
    spawner: Rc<dyn ProcessSpawner>,
    settings: RestoreSettings,
}

/// Sessions directory from an explicit override, else the configuration.
pub fn resolve_sessions_dir(
    config: &WinsnapConfig,
    override_dir: Option<PathBuf>,
) -> Result<PathBuf, SnapshotError> {
    let (dir, source) = match override_dir {
        Some(dir) => (dir, "cli"),
        None => {
            let dir = config
                .sessions_dir()
                .ok_or_else(|| SnapshotError::StorageUnavailable {
                    message: "could not determine the user configuration directory".to_string(),
                })?;
            (dir, "config")
        }
    };
    events::log_sessions_dir_resolved(&dir, source);
    Ok(dir)
}

impl SnapshotService {
    pub fn new(
        host: Rc<dyn WindowSystem>,
        inspector: Rc<dyn ProcessInspector>,
        spawner: Rc<dyn ProcessSpawner>,
        store: SnapshotStore,
        settings: RestoreSettings,
    ) -> Self {
        let registry = WindowRegistry::new(Rc::clone(&host), inspector);
        info!(
            event = "core.service.started",
            sessions_dir = %store.dir().display()
        );
        Self {
            host,
            registry,
            store,
            spawner,
            settings,
        }
    }

    /// Service backed by the OS process table and `std::process` spawning.
    pub fn from_config(
        host: Rc<dyn WindowSystem>,
        config: &WinsnapConfig,
        sessions_dir: Option<PathBuf>,
    ) -> Result<Self, SnapshotError> {
        let dir = resolve_sessions_dir(config, sessions_dir)?;
        Ok(Self::new(
            host,
            Rc::new(SysinfoInspector),
            Rc::new(CommandSpawner),
            SnapshotStore::new(dir),
            RestoreSettings::from(&config.restore),
        ))
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn settings(&self) -> &RestoreSettings {
        &self.settings
    }

    pub fn save_session(&self, name: &str) -> Result<PathBuf, SnapshotError> {
        self.capture_session(name).map(|(_, path)| path)
    }

    /// Save `name` and return the written snapshot with its path. Windows
    /// that closed during capture are not in the snapshot.
    pub fn capture_session(&self, name: &str) -> Result<(Snapshot, PathBuf), SnapshotError> {
        self.store
            .capture_and_write(name, &self.registry, self.host.as_ref())
            .inspect_err(|e| {
                error!(event = "core.snapshot.save_failed", name = name, error = %e);
            })
    }

    pub fn list_sessions(&self) -> Result<Vec<SessionEntry>, SnapshotError> {
        self.store.list_sessions().inspect_err(|e| {
            error!(event = "core.snapshot.list_failed", error = %e);
        })
    }

    pub fn load_session(&self, filename: &str) -> Result<Snapshot, SnapshotError> {
        self.store.load_session(filename).inspect_err(|e| {
            error!(
                event = "core.snapshot.load_failed",
                filename = filename,
                error = %e
            );
        })
    }

    pub fn delete_session(&self, filename: &str) -> Result<(), SnapshotError> {
        self.store.delete_session(filename).inspect_err(|e| {
            error!(
                event = "core.snapshot.delete_failed",
                filename = filename,
                error = %e
            );
        })
    }

    /// Restore `snapshot`. Failures are reported per window.
    pub async fn launch_session(
        &self,
        snapshot: &Snapshot,
        cancel: &CancellationToken,
    ) -> RestoreReport {
        let orchestrator = RestoreOrchestrator::new(
            &self.registry,
            self.host.as_ref(),
            self.spawner.as_ref(),
            self.settings.clone(),
        );
        orchestrator.restore(snapshot, cancel).await
    }

    /// Stop tracking windows. Later calls do nothing.
    pub fn shutdown(&self) {
        self.registry.destroy();
    }
}
