use super::errors::SnapshotError;

pub const SNAPSHOT_EXTENSION: &str = "json";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn snapshot_filename(name: &str) -> String {
    format!("{}.{}", sanitize(name), SNAPSHOT_EXTENSION)
}

/// Reject names that would address anything outside the storage directory.
pub fn validate_filename(filename: &str) -> Result<(), SnapshotError> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');

    if invalid {
        return Err(SnapshotError::InvalidFilename {
            filename: filename.to_string(),
        });
    }
    Ok(())
}
