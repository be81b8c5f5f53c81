use crate::errors::WinsnapError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Cannot spawn an empty command line")]
    EmptyCommand,

    #[error("Failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },
}

impl WinsnapError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::EmptyCommand => "PROCESS_EMPTY_COMMAND",
            ProcessError::SpawnFailed { .. } => "PROCESS_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProcessError::EmptyCommand)
    }
}
