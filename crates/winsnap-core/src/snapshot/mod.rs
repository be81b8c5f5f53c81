pub mod capture;
pub mod errors;
pub mod naming;
pub mod persistence;
pub mod types;

pub use capture::capture_snapshot;
pub use errors::SnapshotError;
pub use naming::{sanitize, snapshot_filename, validate_filename};
pub use persistence::SnapshotStore;
pub use types::{SessionEntry, Snapshot, WindowRecord};
