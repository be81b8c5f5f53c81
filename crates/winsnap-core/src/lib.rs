//! winsnap-core: capture and restore desktop window layouts
//!
//! Tracks the desktop's top-level windows, saves their placement as named
//! JSON snapshots and restores a snapshot by reusing running windows or
//! relaunching their applications.
//!
//! # Main Entry Points
//!
//! - [`service`] - Save, list, load, delete and restore sessions
//! - [`windows`] - Window fingerprints and the live registry
//! - [`snapshot`] - Snapshot documents and their storage
//! - [`restore`] - Restore orchestration
//! - [`host`] - Window system abstraction and the Hyprland backend
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod host;
pub mod logging;
pub mod process;
pub mod restore;
pub mod service;
pub mod snapshot;
pub mod windows;

#[cfg(test)]
pub(crate) mod testing;

pub use config::WinsnapConfig;
pub use errors::{ConfigError, WinsnapError, WinsnapResult};
pub use host::{HostError, HyprlandHost, WindowHandle, WindowSystem};
pub use restore::{RestoreOutcome, RestoreReport, WindowOutcome};
pub use service::SnapshotService;
pub use snapshot::{SessionEntry, Snapshot, SnapshotError, SnapshotStore};
pub use windows::{Fingerprint, WindowRegistry};

pub use logging::init_logging;
