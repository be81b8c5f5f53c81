//! Window identity.
//!
//! A [`Fingerprint`] is captured once when a window is observed and never
//! changes afterwards. Windows are indexed by the [`MatchKey`] derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::WindowProperties;
use crate::process::ProcessInspector;

/// Immutable identity of a window as observed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pid: i32,
    #[serde(default)]
    wm_class: String,
    #[serde(default, with = "stable_sequence")]
    stable_sequence: Option<u64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    cmd_line: Option<Vec<String>>,
}

impl Fingerprint {
    /// A zero stable sequence and an empty argv are both treated as absent.
    pub fn new(
        pid: i32,
        wm_class: impl Into<String>,
        stable_sequence: Option<u64>,
        title: impl Into<String>,
        cmd_line: Option<Vec<String>>,
    ) -> Self {
        Self {
            pid,
            wm_class: wm_class.into(),
            stable_sequence: stable_sequence.filter(|seq| *seq != 0),
            title: title.into(),
            cmd_line: cmd_line.filter(|args| !args.is_empty()),
        }
    }

    /// Fingerprint a window from its host properties, reading the owning
    /// process's command line through `inspector`.
    pub fn capture(properties: &WindowProperties, inspector: &dyn ProcessInspector) -> Self {
        let cmd_line = if properties.pid > 0 {
            inspector.command_line(properties.pid)
        } else {
            None
        };

        Self::new(
            properties.pid,
            properties.wm_class.clone(),
            properties.stable_sequence,
            properties.title.clone(),
            cmd_line,
        )
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn wm_class(&self) -> &str {
        &self.wm_class
    }

    pub fn stable_sequence(&self) -> Option<u64> {
        self.stable_sequence.filter(|seq| *seq != 0)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn command_line(&self) -> Option<&[String]> {
        self.cmd_line
            .as_deref()
            .filter(|args| args.iter().any(|arg| !arg.is_empty()))
    }

    /// Key used to index this window: sequence-based when a stable sequence
    /// is known, title-based otherwise.
    pub fn match_key(&self) -> MatchKey {
        self.sequence_key().unwrap_or_else(|| self.title_key())
    }

    pub fn sequence_key(&self) -> Option<MatchKey> {
        self.stable_sequence().map(|sequence| MatchKey::Sequence {
            sequence,
            wm_class: self.wm_class.clone(),
        })
    }

    pub fn title_key(&self) -> MatchKey {
        MatchKey::Title {
            title: self.title.clone(),
            wm_class: self.wm_class.clone(),
        }
    }
}

/// Registry index key derived from a [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchKey {
    Sequence { sequence: u64, wm_class: String },
    Title { title: String, wm_class: String },
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKey::Sequence { sequence, wm_class } => write!(f, "{}:{}", sequence, wm_class),
            MatchKey::Title { title, wm_class } => write!(f, "{}:{}", title, wm_class),
        }
    }
}

/// `stableSequence` is persisted as an integer with `0` meaning absent;
/// `null` is accepted on read.
mod stable_sequence {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let raw = Option::<u64>::deserialize(deserializer)?;
        Ok(raw.filter(|seq| *seq != 0))
    }
}
