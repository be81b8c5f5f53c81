//! Callback bookkeeping shared by window system backends.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use super::traits::{SignalCallback, WindowSystem};
use super::types::{SignalId, WindowHandle, WindowSignal};

/// Connected callbacks, keyed by the id handed out at connect time.
#[derive(Default)]
pub struct SignalHub {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SignalId, WindowSignal, SignalCallback)>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, signal: WindowSignal, callback: SignalCallback) -> SignalId {
        let id = SignalId::new(self.next_id.get() + 1);
        self.next_id.set(id.as_u64());
        self.handlers.borrow_mut().push((id, signal, callback));
        id
    }

    /// Returns whether a handler was removed.
    pub fn disconnect(&self, id: SignalId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _, _)| *handler_id != id);
        before != handlers.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Invoke every handler connected to `signal`.
    ///
    /// Handlers are cloned out first so they may query the host, or connect
    /// and disconnect, while being dispatched.
    pub fn emit(&self, host: &dyn WindowSystem, signal: WindowSignal, window: WindowHandle) {
        let matching: Vec<SignalCallback> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, handler_signal, _)| *handler_signal == signal)
            .map(|(_, _, callback)| Rc::clone(callback))
            .collect();

        debug!(
            event = "core.host.signal_emitted",
            signal = %signal,
            window = %window,
            handlers = matching.len()
        );

        for callback in matching {
            callback(host, window);
        }
    }
}
