//! Snapshot file persistence
//!
//! Snapshots are pretty-printed JSON documents, one per file, written
//! atomically through a temp file and rename.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::capture::capture_snapshot;
use super::errors::SnapshotError;
use super::naming::{SNAPSHOT_EXTENSION, snapshot_filename, validate_filename};
use super::types::{SessionEntry, Snapshot};
use crate::host::WindowSystem;
use crate::windows::WindowRegistry;

/// Directory-backed snapshot storage.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            event = "core.snapshot.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after write error"
        );
    }
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Capture the registry's windows and write them as snapshot `name`.
    ///
    /// Returns the written file's path.
    pub fn save_session(
        &self,
        name: &str,
        registry: &WindowRegistry,
        host: &dyn WindowSystem,
    ) -> Result<PathBuf, SnapshotError> {
        self.capture_and_write(name, registry, host)
            .map(|(_, path)| path)
    }

    /// Like [`save_session`](Self::save_session), also returning the
    /// snapshot as written.
    pub fn capture_and_write(
        &self,
        name: &str,
        registry: &WindowRegistry,
        host: &dyn WindowSystem,
    ) -> Result<(Snapshot, PathBuf), SnapshotError> {
        if name.trim().is_empty() {
            return Err(SnapshotError::InvalidName);
        }

        let snapshot = capture_snapshot(name, registry, host)?;
        let path = self.write(&snapshot)?;
        Ok((snapshot, path))
    }

    /// Write `snapshot` to `<dir>/<sanitized name>.json`, replacing any
    /// previous file of that name.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, SnapshotError> {
        if snapshot.name.trim().is_empty() {
            return Err(SnapshotError::InvalidName);
        }

        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(snapshot_filename(&snapshot.name));
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
            error!(
                event = "core.snapshot.serialization_failed",
                name = %snapshot.name,
                error = %e
            );
            SnapshotError::Io {
                source: std::io::Error::new(ErrorKind::InvalidData, e),
            }
        })?;

        let temp_file = path.with_extension("json.tmp");

        if let Err(e) = fs::write(&temp_file, &json) {
            cleanup_temp_file(&temp_file, &e);
            return Err(SnapshotError::Io { source: e });
        }

        if let Err(e) = fs::rename(&temp_file, &path) {
            cleanup_temp_file(&temp_file, &e);
            return Err(SnapshotError::Io { source: e });
        }

        info!(
            event = "core.snapshot.save_completed",
            name = %snapshot.name,
            path = %path.display(),
            windows = snapshot.windows.len()
        );
        Ok(path)
    }

    /// Stored snapshots sorted by name. A missing directory lists as empty.
    pub fn list_sessions(&self) -> Result<Vec<SessionEntry>, SnapshotError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::Io { source: e }),
        };

        let mut sessions = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        event = "core.snapshot.list_entry_failed",
                        dir = %self.dir.display(),
                        error = %e,
                        "Failed to read directory entry, skipping"
                    );
                    continue;
                }
            };
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            // Metadata follows symlinks; dangling links and directories are skipped.
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!(
                        event = "core.snapshot.list_entry_failed",
                        file = %path.display(),
                        error = %e,
                        "Failed to stat session file, skipping"
                    );
                    continue;
                }
            }

            let (Some(filename), Some(name)) = (
                path.file_name().and_then(|s| s.to_str()),
                path.file_stem().and_then(|s| s.to_str()),
            ) else {
                continue;
            };

            sessions.push(SessionEntry {
                name: name.to_string(),
                filename: filename.to_string(),
                path: path.clone(),
            });
        }

        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }

    /// Read and parse `<dir>/<filename>`.
    pub fn load_session(&self, filename: &str) -> Result<Snapshot, SnapshotError> {
        validate_filename(filename)?;
        let path = self.dir.join(filename);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound {
                    filename: filename.to_string(),
                });
            }
            Err(e) => return Err(SnapshotError::Io { source: e }),
        };

        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|e| SnapshotError::Parse {
                filename: filename.to_string(),
                message: e.to_string(),
            })?;

        info!(
            event = "core.snapshot.load_completed",
            filename = filename,
            windows = snapshot.windows.len()
        );
        Ok(snapshot)
    }

    pub fn delete_session(&self, filename: &str) -> Result<(), SnapshotError> {
        validate_filename(filename)?;
        let path = self.dir.join(filename);

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(event = "core.snapshot.delete_completed", filename = filename);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SnapshotError::NotFound {
                filename: filename.to_string(),
            }),
            Err(e) => Err(SnapshotError::Io { source: e }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Geometry, Maximized, WindowHandle, WindowState};
    use crate::snapshot::types::WindowRecord;
    use crate::testing::{FakeHost, FakeInspector, monitor, window_props};
    use crate::windows::Fingerprint;
    use chrono::TimeZone;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn sample_snapshot(name: &str) -> Snapshot {
        Snapshot {
            name: name.to_string(),
            timestamp: chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            monitors: vec![monitor(0, true), monitor(1, false)],
            windows: vec![
                WindowRecord {
                    fingerprint: Fingerprint::new(
                        100,
                        "firefox",
                        Some(12),
                        "Mozilla Firefox",
                        Some(vec!["/usr/bin/firefox".to_string()]),
                    ),
                    monitor: 0,
                    workspace: Some(1),
                    geometry: Geometry {
                        x: 0,
                        y: 0,
                        width: 1280,
                        height: 1024,
                    },
                    state: WindowState {
                        maximized: Maximized::Vertical,
                        ..Default::default()
                    },
                },
                WindowRecord {
                    fingerprint: Fingerprint::new(200, "kitty", None, "shell", None),
                    monitor: 1,
                    workspace: None,
                    geometry: Geometry::default(),
                    state: WindowState {
                        sticky: true,
                        ..Default::default()
                    },
                },
            ],
        }
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("sessions"));
        let snapshot = sample_snapshot("My Session!");

        let path = store.write(&snapshot).unwrap();
        assert_eq!(path.file_name().unwrap(), "My_Session_.json");
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = store.load_session("My_Session_.json").unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_written_document_uses_persisted_field_names() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        let path = store.write(&sample_snapshot("work")).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("{\n  \"name\""));

        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["monitors"][0]["is_primary"], true);
        assert_eq!(value["windows"][0]["fingerprint"]["wmClass"], "firefox");
        assert_eq!(value["windows"][0]["state"]["maximized"], 2);
        assert!(value["windows"][1]["workspace"].is_null());
        assert_eq!(value["windows"][1]["fingerprint"]["stableSequence"], 0);
    }

    #[test]
    fn test_save_session_rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        let host = FakeHost::new();
        let registry = WindowRegistry::new(host.clone(), Rc::new(FakeInspector::default()));

        let result = store.save_session("  ", &registry, &*host);
        assert!(matches!(result, Err(SnapshotError::InvalidName)));
    }

    #[test]
    fn test_save_session_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("sessions");
        let store = SnapshotStore::new(&dir);
        let host = FakeHost::new();
        let registry = WindowRegistry::new(host.clone(), Rc::new(FakeInspector::default()));
        host.open_window(WindowHandle::new(1), window_props(1, "gedit", Some(1), "notes"));

        let path = store.save_session("daily", &registry, &*host).unwrap();
        assert_eq!(path, dir.join("daily.json"));

        let loaded = store.load_session("daily.json").unwrap();
        assert_eq!(loaded.windows.len(), 1);
        assert_eq!(loaded.windows[0].fingerprint.title(), "notes");
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("does-not-exist"));
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_list_only_json_files_sorted() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        store.write(&sample_snapshot("zeta")).unwrap();
        store.write(&sample_snapshot("alpha")).unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("dir.json")).unwrap();

        let sessions = store.list_sessions().unwrap();
        let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(sessions[0].filename, "alpha.json");
        assert_eq!(sessions[0].path, temp.path().join("alpha.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_includes_symlinked_sessions() {
        let temp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target_store = SnapshotStore::new(elsewhere.path());
        target_store.write(&sample_snapshot("work")).unwrap();

        let store = SnapshotStore::new(temp.path());
        std::os::unix::fs::symlink(
            elsewhere.path().join("work.json"),
            temp.path().join("work.json"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            elsewhere.path().join("gone.json"),
            temp.path().join("gone.json"),
        )
        .unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].filename, "work.json");
        assert_eq!(store.load_session("work.json").unwrap().name, "work");
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        let result = store.load_session("missing.json");
        assert!(matches!(result, Err(SnapshotError::NotFound { .. })));
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.json"), "{ not json").unwrap();
        let store = SnapshotStore::new(temp.path());

        let result = store.load_session("broken.json");
        assert!(matches!(result, Err(SnapshotError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_path_traversal() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        let result = store.load_session("../secret.json");
        assert!(matches!(result, Err(SnapshotError::InvalidFilename { .. })));
    }

    #[test]
    fn test_delete_session() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path());
        store.write(&sample_snapshot("old")).unwrap();

        store.delete_session("old.json").unwrap();
        assert!(store.list_sessions().unwrap().is_empty());
        assert!(matches!(
            store.delete_session("old.json"),
            Err(SnapshotError::NotFound { .. })
        ));
    }
}
