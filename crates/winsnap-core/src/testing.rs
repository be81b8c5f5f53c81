//! In-memory host, inspector and spawner used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::host::{
    Geometry, HostError, MonitorInfo, SignalCallback, SignalHub, SignalId, WindowHandle,
    WindowProperties, WindowSignal, WindowState, WindowSystem, WindowType,
};
use crate::process::{ProcessError, ProcessInspector, ProcessSpawner};

pub fn window_props(pid: i32, wm_class: &str, seq: Option<u64>, title: &str) -> WindowProperties {
    WindowProperties {
        pid,
        wm_class: wm_class.to_string(),
        stable_sequence: seq,
        title: title.to_string(),
        window_type: WindowType::Normal,
        frame: Geometry {
            x: 10,
            y: 20,
            width: 800,
            height: 600,
        },
        workspace: Some(0),
        monitor: 0,
        state: WindowState::default(),
    }
}

pub fn monitor(index: u32, is_primary: bool) -> MonitorInfo {
    MonitorInfo {
        index,
        width: 1920,
        height: 1080,
        x: 1920 * index as i32,
        y: 0,
        is_primary,
        scale: 1.0,
    }
}

/// Scriptable [`WindowSystem`].
pub struct FakeHost {
    windows: RefCell<BTreeMap<WindowHandle, WindowProperties>>,
    monitors: RefCell<Vec<MonitorInfo>>,
    workspace_count: Cell<u32>,
    fail_moves: Cell<bool>,
    moves: RefCell<Vec<(WindowHandle, u32)>>,
    resizes: RefCell<Vec<(WindowHandle, Geometry)>>,
    signals: SignalHub,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            windows: RefCell::new(BTreeMap::new()),
            monitors: RefCell::new(vec![monitor(0, true)]),
            workspace_count: Cell::new(4),
            fail_moves: Cell::new(false),
            moves: RefCell::new(Vec::new()),
            resizes: RefCell::new(Vec::new()),
            signals: SignalHub::new(),
        })
    }

    pub fn handler_count(&self) -> usize {
        self.signals.handler_count()
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        *self.monitors.borrow_mut() = monitors;
    }

    pub fn set_workspace_count(&self, count: u32) {
        self.workspace_count.set(count);
    }

    pub fn fail_moves(&self) {
        self.fail_moves.set(true);
    }

    pub fn moves(&self) -> Vec<(WindowHandle, u32)> {
        self.moves.borrow().clone()
    }

    pub fn resizes(&self) -> Vec<(WindowHandle, Geometry)> {
        self.resizes.borrow().clone()
    }

    /// Add a window without notifying subscribers.
    pub fn insert_window(&self, handle: WindowHandle, properties: WindowProperties) {
        self.windows.borrow_mut().insert(handle, properties);
    }

    /// Remove a window without notifying subscribers.
    pub fn forget_window(&self, handle: WindowHandle) {
        self.windows.borrow_mut().remove(&handle);
    }

    pub fn open_window(&self, handle: WindowHandle, properties: WindowProperties) {
        self.insert_window(handle, properties);
        self.signals.emit(self, WindowSignal::Appeared, handle);
    }

    /// Notify subscribers, then drop the window, matching hosts that signal
    /// before the window is fully gone.
    pub fn close_window(&self, handle: WindowHandle) {
        self.signals.emit(self, WindowSignal::Removed, handle);
        self.forget_window(handle);
    }

    pub fn emit_removed(&self, handle: WindowHandle) {
        self.signals.emit(self, WindowSignal::Removed, handle);
    }

    pub fn retitle_window(&self, handle: WindowHandle, title: &str) {
        if let Some(props) = self.windows.borrow_mut().get_mut(&handle) {
            props.title = title.to_string();
        }
        self.signals.emit(self, WindowSignal::TitleChanged, handle);
    }
}

impl WindowSystem for FakeHost {
    fn windows(&self) -> Result<Vec<WindowHandle>, HostError> {
        Ok(self.windows.borrow().keys().copied().collect())
    }

    fn properties(&self, window: WindowHandle) -> Result<WindowProperties, HostError> {
        self.windows
            .borrow()
            .get(&window)
            .cloned()
            .ok_or(HostError::WindowGone { handle: window })
    }

    fn monitors(&self) -> Result<Vec<MonitorInfo>, HostError> {
        Ok(self.monitors.borrow().clone())
    }

    fn has_workspace(&self, index: u32) -> bool {
        index < self.workspace_count.get()
    }

    fn move_to_workspace(&self, window: WindowHandle, index: u32) -> Result<(), HostError> {
        if self.fail_moves.get() {
            return Err(HostError::CommandFailed {
                command: "move_to_workspace".to_string(),
                message: "refused by fake host".to_string(),
            });
        }
        self.moves.borrow_mut().push((window, index));
        if let Some(props) = self.windows.borrow_mut().get_mut(&window) {
            props.workspace = Some(index);
        }
        Ok(())
    }

    fn move_resize(&self, window: WindowHandle, frame: Geometry) -> Result<(), HostError> {
        self.resizes.borrow_mut().push((window, frame));
        Ok(())
    }

    fn connect(&self, signal: WindowSignal, callback: SignalCallback) -> SignalId {
        self.signals.connect(signal, callback)
    }

    fn disconnect(&self, id: SignalId) {
        self.signals.disconnect(id);
    }
}

/// [`ProcessInspector`] answering from a fixed pid table.
#[derive(Default)]
pub struct FakeInspector {
    command_lines: HashMap<i32, Vec<String>>,
}

impl FakeInspector {
    pub fn with(mut self, pid: i32, argv: &[&str]) -> Self {
        self.command_lines
            .insert(pid, argv.iter().map(|arg| arg.to_string()).collect());
        self
    }
}

impl ProcessInspector for FakeInspector {
    fn command_line(&self, pid: i32) -> Option<Vec<String>> {
        self.command_lines.get(&pid).cloned()
    }
}

type SpawnHook = Box<dyn Fn(&[String])>;

/// [`ProcessSpawner`] that records every argv instead of running it.
#[derive(Default)]
pub struct RecordingSpawner {
    calls: RefCell<Vec<Vec<String>>>,
    fail: Cell<bool>,
    on_spawn: RefCell<Option<SpawnHook>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let spawner = Self::default();
        spawner.fail.set(true);
        spawner
    }

    /// Run `hook` synchronously on every successful spawn.
    pub fn on_spawn(&self, hook: impl Fn(&[String]) + 'static) {
        *self.on_spawn.borrow_mut() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, argv: &[String]) -> Result<u32, ProcessError> {
        self.calls.borrow_mut().push(argv.to_vec());
        if self.fail.get() {
            return Err(ProcessError::SpawnFailed {
                program: argv.first().cloned().unwrap_or_default(),
                message: "spawn disabled".to_string(),
            });
        }
        if let Some(hook) = self.on_spawn.borrow().as_ref() {
            hook(argv);
        }
        Ok(4000 + self.calls.borrow().len() as u32)
    }
}
