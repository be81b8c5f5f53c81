//! Window system abstraction.
//!
//! The rest of the crate talks to the desktop only through [`WindowSystem`].
//! [`hyprland::HyprlandHost`] is the bundled backend.

pub mod errors;
pub mod hyprland;
pub mod signals;
pub mod subscription;
pub mod traits;
pub mod types;

pub use errors::HostError;
pub use hyprland::HyprlandHost;
pub use signals::SignalHub;
pub use subscription::Subscription;
pub use traits::{SignalCallback, WindowSystem};
pub use types::{
    Geometry, Maximized, MonitorInfo, SignalId, WindowHandle, WindowProperties, WindowSignal,
    WindowState, WindowType,
};
