//! Live index of tracked top-level windows.
//!
//! The registry subscribes to host window signals on construction and keeps a
//! `MatchKey -> TrackedWindow` mapping current. It never owns host windows:
//! entries hold a [`WindowHandle`] and the fingerprint captured when the
//! window was observed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::fingerprint::{Fingerprint, MatchKey};
use crate::host::{
    SignalCallback, Subscription, WindowHandle, WindowSignal, WindowSystem, WindowType,
};
use crate::process::ProcessInspector;

/// A window known to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedWindow {
    pub handle: WindowHandle,
    pub fingerprint: Fingerprint,
}

#[derive(Debug)]
struct Entry {
    window: TrackedWindow,
    observed: u64,
}

#[derive(Debug, Default)]
struct RegistryState {
    by_key: HashMap<MatchKey, Entry>,
    keys_by_handle: HashMap<WindowHandle, MatchKey>,
    by_title: HashMap<(String, String), WindowHandle>,
    next_observed: u64,
}

impl RegistryState {
    fn track(&mut self, handle: WindowHandle, fingerprint: Fingerprint) {
        self.untrack(handle);

        let key = fingerprint.match_key();
        if let Some(previous) = self.by_key.get(&key).map(|entry| entry.window.handle) {
            debug!(
                event = "core.registry.key_overwritten",
                key = %key,
                previous = %previous,
                window = %handle
            );
            self.untrack(previous);
        }

        let title_key = (
            fingerprint.title().to_string(),
            fingerprint.wm_class().to_string(),
        );
        self.by_title.insert(title_key, handle);
        self.keys_by_handle.insert(handle, key.clone());

        self.next_observed += 1;
        self.by_key.insert(
            key,
            Entry {
                window: TrackedWindow {
                    handle,
                    fingerprint,
                },
                observed: self.next_observed,
            },
        );
    }

    fn untrack(&mut self, handle: WindowHandle) -> Option<TrackedWindow> {
        let key = self.keys_by_handle.remove(&handle)?;
        let entry = self.by_key.remove(&key)?;

        let title_key = (
            entry.window.fingerprint.title().to_string(),
            entry.window.fingerprint.wm_class().to_string(),
        );
        if self.by_title.get(&title_key) == Some(&handle) {
            // Hand the title over to the newest remaining window that shares it.
            let successor = self
                .by_key
                .values()
                .filter(|other| {
                    other.window.fingerprint.title() == title_key.0
                        && other.window.fingerprint.wm_class() == title_key.1
                })
                .max_by_key(|other| other.observed)
                .map(|other| other.window.handle);
            match successor {
                Some(other) => self.by_title.insert(title_key, other),
                None => self.by_title.remove(&title_key),
            };
        }

        Some(entry.window)
    }

    fn fingerprint_of(&self, handle: WindowHandle) -> Option<&Fingerprint> {
        let key = self.keys_by_handle.get(&handle)?;
        self.by_key.get(key).map(|entry| &entry.window.fingerprint)
    }

    fn clear(&mut self) {
        self.by_key.clear();
        self.keys_by_handle.clear();
        self.by_title.clear();
    }
}

/// Event-fed registry of the host's normal windows.
pub struct WindowRegistry {
    state: Rc<RefCell<RegistryState>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl WindowRegistry {
    /// Subscribe to `host` window signals and seed the registry with the
    /// windows the host already shows.
    pub fn new(host: Rc<dyn WindowSystem>, inspector: Rc<dyn ProcessInspector>) -> Self {
        let state = Rc::new(RefCell::new(RegistryState::default()));

        let subscriptions = [
            WindowSignal::Appeared,
            WindowSignal::Removed,
            WindowSignal::TitleChanged,
        ]
        .into_iter()
        .map(|signal| {
            let callback = signal_handler(signal, &state, &inspector);
            Subscription::connect(&host, signal, callback)
        })
        .collect();

        match host.windows() {
            Ok(handles) => {
                for handle in handles {
                    on_window_appeared(&state, host.as_ref(), inspector.as_ref(), handle);
                }
            }
            Err(e) => {
                warn!(
                    event = "core.registry.seed_failed",
                    error = %e,
                    "Could not enumerate existing windows, tracking new windows only"
                );
            }
        }

        info!(
            event = "core.registry.started",
            tracked = state.borrow().by_key.len()
        );

        Self {
            state,
            subscriptions: RefCell::new(subscriptions),
        }
    }

    /// Point-in-time copy of every tracked window, in observation order.
    pub fn all_windows(&self) -> Vec<TrackedWindow> {
        let state = self.state.borrow();
        let mut entries: Vec<&Entry> = state.by_key.values().collect();
        entries.sort_by_key(|entry| entry.observed);
        entries.into_iter().map(|entry| entry.window.clone()).collect()
    }

    /// Find a live window matching `fingerprint`.
    ///
    /// The stable-sequence key is tried first. Otherwise the window whose
    /// title and class both agree is returned, which is how a relaunched
    /// instance with a new sequence is recognised.
    pub fn find_window_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<WindowHandle> {
        let state = self.state.borrow();

        if let Some(key) = fingerprint.sequence_key()
            && let Some(entry) = state.by_key.get(&key)
        {
            return Some(entry.window.handle);
        }

        if let Some(entry) = state.by_key.get(&fingerprint.title_key()) {
            return Some(entry.window.handle);
        }

        state
            .by_title
            .get(&(
                fingerprint.title().to_string(),
                fingerprint.wm_class().to_string(),
            ))
            .copied()
    }

    pub fn is_tracked(&self, handle: WindowHandle) -> bool {
        self.state.borrow().keys_by_handle.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the registry still receives host signals.
    pub fn is_active(&self) -> bool {
        !self.subscriptions.borrow().is_empty()
    }

    /// Release every host subscription and forget all windows.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn destroy(&self) {
        let released: Vec<Subscription> = self.subscriptions.borrow_mut().drain(..).collect();
        if released.is_empty() {
            return;
        }

        let count = released.len();
        drop(released);
        self.state.borrow_mut().clear();

        info!(event = "core.registry.destroyed", subscriptions = count);
    }
}

impl Drop for WindowRegistry {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn signal_handler(
    signal: WindowSignal,
    state: &Rc<RefCell<RegistryState>>,
    inspector: &Rc<dyn ProcessInspector>,
) -> SignalCallback {
    let state = Rc::downgrade(state);
    let inspector = Rc::clone(inspector);

    Rc::new(move |host: &dyn WindowSystem, handle: WindowHandle| {
        let Some(state) = state.upgrade() else {
            return;
        };
        match signal {
            WindowSignal::Appeared => {
                on_window_appeared(&state, host, inspector.as_ref(), handle);
            }
            WindowSignal::Removed => on_window_removed(&state, handle),
            WindowSignal::TitleChanged => {
                on_title_changed(&state, host, handle);
            }
        }
    })
}

fn on_window_appeared(
    state: &RefCell<RegistryState>,
    host: &dyn WindowSystem,
    inspector: &dyn ProcessInspector,
    handle: WindowHandle,
) {
    let properties = match host.properties(handle) {
        Ok(properties) => properties,
        Err(e) => {
            debug!(
                event = "core.registry.properties_unavailable",
                window = %handle,
                error = %e
            );
            return;
        }
    };

    if properties.window_type != WindowType::Normal {
        debug!(
            event = "core.registry.window_ignored",
            window = %handle,
            window_type = ?properties.window_type
        );
        return;
    }

    let fingerprint = Fingerprint::capture(&properties, inspector);
    info!(
        event = "core.registry.window_tracked",
        window = %handle,
        title = fingerprint.title(),
        wm_class = fingerprint.wm_class(),
        key = %fingerprint.match_key()
    );
    state.borrow_mut().track(handle, fingerprint);
}

/// Removal uses the fingerprint stored at observation time. The handle may
/// already be half torn down, so nothing is re-read from the host.
fn on_window_removed(state: &RefCell<RegistryState>, handle: WindowHandle) {
    match state.borrow_mut().untrack(handle) {
        Some(window) => info!(
            event = "core.registry.window_removed",
            window = %handle,
            title = window.fingerprint.title()
        ),
        None => debug!(event = "core.registry.remove_untracked", window = %handle),
    }
}

fn on_title_changed(state: &RefCell<RegistryState>, host: &dyn WindowSystem, handle: WindowHandle) {
    let Some(previous) = state.borrow().fingerprint_of(handle).cloned() else {
        return;
    };

    let title = match host.properties(handle) {
        Ok(properties) => properties.title,
        Err(e) => {
            debug!(
                event = "core.registry.properties_unavailable",
                window = %handle,
                error = %e
            );
            return;
        }
    };

    if title == previous.title() {
        return;
    }

    let fingerprint = Fingerprint::new(
        previous.pid(),
        previous.wm_class(),
        previous.stable_sequence(),
        title,
        previous.command_line().map(|args| args.to_vec()),
    );
    debug!(
        event = "core.registry.window_retitled",
        window = %handle,
        title = fingerprint.title()
    );
    state.borrow_mut().track(handle, fingerprint);
}
