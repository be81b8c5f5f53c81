use crate::errors::WinsnapError;
use crate::host::types::WindowHandle;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Window system unavailable: {message}")]
    Unavailable { message: String },

    #[error("Window {handle} no longer exists")]
    WindowGone { handle: WindowHandle },

    #[error("Window system query failed: {message}")]
    QueryFailed { message: String },

    #[error("Window system command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Operation '{operation}' is not supported by this window system")]
    Unsupported { operation: &'static str },

    #[error("IO error talking to window system: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl WinsnapError for HostError {
    fn error_code(&self) -> &'static str {
        match self {
            HostError::Unavailable { .. } => "HOST_UNAVAILABLE",
            HostError::WindowGone { .. } => "HOST_WINDOW_GONE",
            HostError::QueryFailed { .. } => "HOST_QUERY_FAILED",
            HostError::CommandFailed { .. } => "HOST_COMMAND_FAILED",
            HostError::Unsupported { .. } => "HOST_UNSUPPORTED",
            HostError::IoError { .. } => "HOST_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, HostError::Unavailable { .. })
    }
}
