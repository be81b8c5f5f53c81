use std::fmt;
use std::path::PathBuf;

/// How a missing window's application gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Launch through an application descriptor with `gio launch`.
    Descriptor(PathBuf),
    /// Run the recorded command line as-is.
    CommandLine(Vec<String>),
}

impl LaunchPlan {
    /// Pick a plan. A descriptor is only usable when `gio` is available.
    pub fn choose(descriptor: Option<PathBuf>, command_line: &[String], gio_available: bool) -> Self {
        match descriptor {
            Some(path) if gio_available => LaunchPlan::Descriptor(path),
            _ => LaunchPlan::CommandLine(command_line.to_vec()),
        }
    }

    pub fn argv(&self) -> Vec<String> {
        match self {
            LaunchPlan::Descriptor(path) => vec![
                "gio".to_string(),
                "launch".to_string(),
                path.to_string_lossy().into_owned(),
            ],
            LaunchPlan::CommandLine(argv) => argv.clone(),
        }
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchPlan::Descriptor(path) => write!(f, "descriptor {}", path.display()),
            LaunchPlan::CommandLine(argv) => write!(f, "command line {}", argv.join(" ")),
        }
    }
}

/// Whether `gio` can be found on `PATH`.
pub fn gio_available() -> bool {
    which::which("gio").is_ok()
}
