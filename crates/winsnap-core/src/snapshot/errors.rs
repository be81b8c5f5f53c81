use crate::errors::WinsnapError;
use crate::host::HostError;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot '{filename}' not found")]
    NotFound { filename: String },

    #[error("Snapshot '{filename}' is not a valid document: {message}")]
    Parse { filename: String, message: String },

    #[error("Invalid snapshot name: cannot be empty")]
    InvalidName,

    #[error("Invalid snapshot filename '{filename}': must be a plain file name")]
    InvalidFilename { filename: String },

    #[error("Snapshot storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Window system error while capturing: {source}")]
    Host {
        #[from]
        source: HostError,
    },

    #[error("IO operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WinsnapError for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            SnapshotError::NotFound { .. } => "SNAPSHOT_NOT_FOUND",
            SnapshotError::Parse { .. } => "SNAPSHOT_PARSE_ERROR",
            SnapshotError::InvalidName => "SNAPSHOT_INVALID_NAME",
            SnapshotError::InvalidFilename { .. } => "SNAPSHOT_INVALID_FILENAME",
            SnapshotError::StorageUnavailable { .. } => "SNAPSHOT_STORAGE_UNAVAILABLE",
            SnapshotError::Host { .. } => "SNAPSHOT_HOST_ERROR",
            SnapshotError::Io { .. } => "SNAPSHOT_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SnapshotError::NotFound { .. }
                | SnapshotError::InvalidName
                | SnapshotError::InvalidFilename { .. }
        )
    }
}
