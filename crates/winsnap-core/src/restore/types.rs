use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::config::RestoreConfig;

/// What happened to one snapshot window during restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreOutcome {
    Launched,
    Reused,
    Skipped,
    Failed,
}

impl RestoreOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestoreOutcome::Launched | RestoreOutcome::Reused)
    }
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RestoreOutcome::Launched => "launched",
            RestoreOutcome::Reused => "reused",
            RestoreOutcome::Skipped => "skipped",
            RestoreOutcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowOutcome {
    pub title: String,
    pub wm_class: String,
    pub outcome: RestoreOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-window outcomes of one restore, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub session: String,
    pub outcomes: Vec<WindowOutcome>,
}

impl RestoreReport {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            outcomes: Vec::new(),
        }
    }

    /// Windows that ended up launched or reused.
    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.is_success())
            .count()
    }

    pub fn count(&self, outcome: RestoreOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Tunables for a restore run.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreSettings {
    pub poll_interval: Duration,
    pub window_timeout: Duration,
    pub restore_geometry: bool,
    pub application_dirs: Vec<PathBuf>,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self::from(&RestoreConfig::default())
    }
}

impl From<&RestoreConfig> for RestoreSettings {
    fn from(config: &RestoreConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            window_timeout: config.window_timeout(),
            restore_geometry: config.restore_geometry,
            application_dirs: config.application_dirs(),
        }
    }
}
