use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque, non-owning reference to a host window.
///
/// The host controls the window's lifetime; holding a handle keeps nothing alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(u64);

impl WindowHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Window classification reported by the window manager.
///
/// Only `Normal` windows (standard top-level application windows) are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    Normal,
    Dialog,
    Dock,
    Popup,
    Other,
}

/// Frame rectangle, excluding client-side decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Maximization flags. Persisted as the integer flag set used by mutter
/// (`1` horizontal, `2` vertical, `3` both).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Maximized {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Maximized {
    pub fn from_flags(flags: u8) -> Option<Self> {
        match flags {
            0 => Some(Maximized::None),
            1 => Some(Maximized::Horizontal),
            2 => Some(Maximized::Vertical),
            3 => Some(Maximized::Both),
            _ => None,
        }
    }

    pub fn flags(&self) -> u8 {
        match self {
            Maximized::None => 0,
            Maximized::Horizontal => 1,
            Maximized::Vertical => 2,
            Maximized::Both => 3,
        }
    }
}

impl Serialize for Maximized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.flags())
    }
}

impl<'de> Deserialize<'de> for Maximized {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older documents store a plain boolean.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flags(u8),
            Flag(bool),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flags(flags) => Maximized::from_flags(flags).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid maximize flags: {}", flags))
            }),
            Raw::Flag(true) => Ok(Maximized::Both),
            Raw::Flag(false) => Ok(Maximized::None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowState {
    pub minimized: bool,
    pub maximized: Maximized,
    pub above: bool,
    pub sticky: bool,
}

/// Everything the host reports about a window at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProperties {
    pub pid: i32,
    pub wm_class: String,
    pub stable_sequence: Option<u64>,
    pub title: String,
    pub window_type: WindowType,
    pub frame: Geometry,
    /// `None` for windows shown on every workspace
    pub workspace: Option<u32>,
    pub monitor: i32,
    pub state: WindowState,
}

/// One connected display output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub index: u32,
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    pub is_primary: bool,
    pub scale: f64,
}

/// Window lifecycle events a host can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSignal {
    Appeared,
    Removed,
    TitleChanged,
}

impl fmt::Display for WindowSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowSignal::Appeared => "appeared",
            WindowSignal::Removed => "removed",
            WindowSignal::TitleChanged => "title_changed",
        };
        f.write_str(name)
    }
}

/// Identifier returned by [`super::WindowSystem::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(u64);

impl SignalId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}
