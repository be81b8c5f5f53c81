//! Window system trait definition.

use std::rc::Rc;

use super::errors::HostError;
use super::types::{Geometry, MonitorInfo, SignalId, WindowHandle, WindowProperties, WindowSignal};

/// Callback invoked by the host for a connected [`WindowSignal`].
///
/// The host passes itself so handlers can query the window without holding
/// a strong reference back to the host.
pub type SignalCallback = Rc<dyn Fn(&dyn WindowSystem, WindowHandle)>;

/// Interface to the desktop's window manager.
///
/// Implementations are single-threaded: signals are delivered on the same
/// thread that queries and mutates windows.
pub trait WindowSystem {
    /// Handles of the windows the host currently shows.
    fn windows(&self) -> Result<Vec<WindowHandle>, HostError>;

    /// Current attributes of a window.
    fn properties(&self, window: WindowHandle) -> Result<WindowProperties, HostError>;

    /// Connected display outputs, indexed from zero.
    fn monitors(&self) -> Result<Vec<MonitorInfo>, HostError>;

    /// Whether a workspace with this zero-based index exists.
    fn has_workspace(&self, index: u32) -> bool;

    /// Move a window to the workspace with this zero-based index.
    fn move_to_workspace(&self, window: WindowHandle, index: u32) -> Result<(), HostError>;

    /// Move and resize a window's frame.
    fn move_resize(&self, _window: WindowHandle, _frame: Geometry) -> Result<(), HostError> {
        Err(HostError::Unsupported {
            operation: "move_resize",
        })
    }

    /// Register a callback for a window lifecycle signal.
    fn connect(&self, signal: WindowSignal, callback: SignalCallback) -> SignalId;

    /// Release a registration made with [`WindowSystem::connect`].
    /// Unknown ids are ignored.
    fn disconnect(&self, id: SignalId);
}
