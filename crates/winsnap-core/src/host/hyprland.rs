//! Hyprland backend.
//!
//! Queries and mutations go through `hyprctl`; window lifecycle events are
//! read from the compositor's `.socket2.sock` event stream by
//! [`HyprlandHost::run_event_pump`]. Hyprland workspace ids start at 1, so
//! zero-based workspace index `n` is workspace id `n + 1`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::errors::HostError;
use super::signals::SignalHub;
use super::traits::{SignalCallback, WindowSystem};
use super::types::{
    Geometry, Maximized, MonitorInfo, SignalId, WindowHandle, WindowProperties, WindowSignal,
    WindowState, WindowType,
};

const SIGNATURE_ENV: &str = "HYPRLAND_INSTANCE_SIGNATURE";
const EVENT_SOCKET: &str = ".socket2.sock";

#[derive(Debug, Clone, Deserialize)]
struct HyprWorkspaceRef {
    id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HyprClient {
    address: String,
    #[serde(default = "default_true")]
    mapped: bool,
    #[serde(default)]
    hidden: bool,
    at: [i32; 2],
    size: [i32; 2],
    workspace: HyprWorkspaceRef,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    monitor: i32,
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    pid: i32,
    /// Integer mode on current releases, a boolean on older ones.
    #[serde(default)]
    fullscreen: serde_json::Value,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct HyprMonitor {
    id: i64,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    #[serde(default = "default_scale")]
    scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

/// One line of the event stream that maps to a window signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyprEvent {
    OpenWindow(WindowHandle),
    CloseWindow(WindowHandle),
    WindowTitle(WindowHandle),
}

impl HyprEvent {
    /// Parse an `EVENT>>DATA` line. Events other than window open, close and
    /// retitle yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let (name, data) = line.split_once(">>")?;
        let address = data.split(',').next()?;
        let handle = parse_address(address)?;

        match name {
            "openwindow" => Some(HyprEvent::OpenWindow(handle)),
            "closewindow" => Some(HyprEvent::CloseWindow(handle)),
            "windowtitle" | "windowtitlev2" => Some(HyprEvent::WindowTitle(handle)),
            _ => None,
        }
    }

    pub fn signal(&self) -> WindowSignal {
        match self {
            HyprEvent::OpenWindow(_) => WindowSignal::Appeared,
            HyprEvent::CloseWindow(_) => WindowSignal::Removed,
            HyprEvent::WindowTitle(_) => WindowSignal::TitleChanged,
        }
    }

    pub fn handle(&self) -> WindowHandle {
        match self {
            HyprEvent::OpenWindow(handle)
            | HyprEvent::CloseWindow(handle)
            | HyprEvent::WindowTitle(handle) => *handle,
        }
    }
}

/// Parse a window address, with or without the `0x` prefix.
pub fn parse_address(address: &str) -> Option<WindowHandle> {
    let hex = address.trim().trim_start_matches("0x");
    u64::from_str_radix(hex, 16)
        .ok()
        .filter(|raw| *raw != 0)
        .map(WindowHandle::new)
}

fn address_of(handle: WindowHandle) -> String {
    format!("address:0x{:x}", handle.as_u64())
}

/// Directory holding the instance's IPC sockets.
pub fn socket_dir(runtime_dir: Option<&Path>, signature: &str) -> PathBuf {
    match runtime_dir {
        Some(dir) => dir.join("hypr").join(signature),
        None => PathBuf::from("/tmp/hypr").join(signature),
    }
}

/// Position of monitor `id` among the monitors sorted by id. This is the
/// index [`monitor_infos`] reports, which keeps window records linked to the
/// saved topology when Hyprland's ids have gaps.
fn monitor_position(sorted_ids: &[i64], id: i64) -> Option<u32> {
    sorted_ids
        .binary_search(&id)
        .ok()
        .and_then(|pos| u32::try_from(pos).ok())
}

fn sorted_monitor_ids(monitors: &[HyprMonitor]) -> Vec<i64> {
    let mut ids: Vec<i64> = monitors.iter().map(|m| m.id).collect();
    ids.sort_unstable();
    ids
}

fn client_properties(client: &HyprClient, monitor_ids: &[i64]) -> WindowProperties {
    let window_type = if client.mapped && !client.hidden {
        WindowType::Normal
    } else {
        WindowType::Other
    };

    // Special (scratchpad) workspaces have negative ids; pinned windows
    // show on every workspace.
    let workspace = if client.pinned || client.workspace.id < 1 {
        None
    } else {
        u32::try_from(client.workspace.id - 1).ok()
    };

    let maximized = match client.fullscreen.as_u64() {
        Some(1) => Maximized::Both,
        _ => Maximized::None,
    };

    let monitor = match monitor_position(monitor_ids, i64::from(client.monitor)) {
        Some(position) => position as i32,
        None => {
            debug!(
                event = "core.host.monitor_unknown",
                monitor = client.monitor,
                address = %client.address
            );
            client.monitor
        }
    };

    WindowProperties {
        pid: client.pid,
        wm_class: client.class.clone(),
        stable_sequence: parse_address(&client.address).map(|h| h.as_u64()),
        title: client.title.clone(),
        window_type,
        frame: Geometry {
            x: client.at[0],
            y: client.at[1],
            width: client.size[0],
            height: client.size[1],
        },
        workspace,
        monitor,
        state: WindowState {
            minimized: false,
            maximized,
            above: false,
            sticky: client.pinned,
        },
    }
}

/// Hyprland has no primary output; the lowest monitor id is reported as
/// primary.
fn monitor_infos(mut monitors: Vec<HyprMonitor>) -> Vec<MonitorInfo> {
    monitors.sort_by_key(|m| m.id);
    monitors
        .into_iter()
        .enumerate()
        .map(|(index, m)| MonitorInfo {
            index: index as u32,
            width: m.width,
            height: m.height,
            x: m.x,
            y: m.y,
            is_primary: index == 0,
            scale: m.scale,
        })
        .collect()
}

/// [`WindowSystem`] for a running Hyprland instance.
pub struct HyprlandHost {
    socket_dir: PathBuf,
    workspace_limit: u32,
    clients: RefCell<Option<Vec<HyprClient>>>,
    monitor_ids: RefCell<Option<Vec<i64>>>,
    signals: SignalHub,
}

impl HyprlandHost {
    /// Locate the running instance from the environment.
    pub fn connect(workspace_limit: u32) -> Result<Rc<Self>, HostError> {
        let signature = std::env::var(SIGNATURE_ENV).map_err(|_| HostError::Unavailable {
            message: format!("{} is not set; is Hyprland running?", SIGNATURE_ENV),
        })?;

        which::which("hyprctl").map_err(|e| HostError::Unavailable {
            message: format!("hyprctl not found on PATH: {}", e),
        })?;

        let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR").map(PathBuf::from);
        let socket_dir = socket_dir(runtime_dir.as_deref(), &signature);

        info!(
            event = "core.host.hyprland_connected",
            socket_dir = %socket_dir.display(),
            workspace_limit = workspace_limit
        );

        Ok(Self::with_socket_dir(socket_dir, workspace_limit))
    }

    pub(crate) fn with_socket_dir(socket_dir: PathBuf, workspace_limit: u32) -> Rc<Self> {
        Rc::new(Self {
            socket_dir,
            workspace_limit,
            clients: RefCell::new(None),
            monitor_ids: RefCell::new(None),
            signals: SignalHub::new(),
        })
    }

    fn hyprctl(&self, args: &[&str]) -> Result<String, HostError> {
        let command = args.join(" ");
        debug!(event = "core.host.hyprctl_started", command = %command);

        let output = Command::new("hyprctl")
            .args(args)
            .output()
            .map_err(|e| HostError::CommandFailed {
                command: command.clone(),
                message: format!("Failed to execute hyprctl: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                event = "core.host.hyprctl_failed",
                command = %command,
                stderr = %stderr.trim()
            );
            return Err(HostError::CommandFailed {
                command,
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn query<T: for<'de> Deserialize<'de>>(&self, what: &str) -> Result<T, HostError> {
        let stdout = self.hyprctl(&["-j", what])?;
        serde_json::from_str(&stdout).map_err(|e| HostError::QueryFailed {
            message: format!("Unexpected `hyprctl -j {}` output: {}", what, e),
        })
    }

    fn dispatch(&self, args: &[&str]) -> Result<(), HostError> {
        let mut full = vec!["dispatch"];
        full.extend_from_slice(args);
        let stdout = self.hyprctl(&full)?;

        // hyprctl exits 0 on rejected dispatches and reports the error on stdout.
        let reply = stdout.trim();
        if reply != "ok" {
            return Err(HostError::CommandFailed {
                command: full.join(" "),
                message: reply.to_string(),
            });
        }

        self.invalidate();
        Ok(())
    }

    fn refresh_clients(&self) -> Result<(), HostError> {
        let clients: Vec<HyprClient> = self.query("clients")?;
        *self.clients.borrow_mut() = Some(clients);
        Ok(())
    }

    fn cached_client(&self, window: WindowHandle) -> Option<HyprClient> {
        self.clients
            .borrow()
            .as_ref()?
            .iter()
            .find(|c| parse_address(&c.address) == Some(window))
            .cloned()
    }

    fn query_monitors(&self) -> Result<Vec<HyprMonitor>, HostError> {
        let monitors: Vec<HyprMonitor> = self.query("monitors")?;
        *self.monitor_ids.borrow_mut() = Some(sorted_monitor_ids(&monitors));
        Ok(monitors)
    }

    fn cached_monitor_ids(&self) -> Result<Vec<i64>, HostError> {
        if let Some(ids) = self.monitor_ids.borrow().as_ref() {
            return Ok(ids.clone());
        }
        let monitors = self.query_monitors()?;
        Ok(sorted_monitor_ids(&monitors))
    }

    fn invalidate(&self) {
        self.clients.borrow_mut().take();
        self.monitor_ids.borrow_mut().take();
    }

    /// Read the event socket and deliver window signals until `cancel`
    /// fires or the compositor closes the stream.
    pub async fn run_event_pump(self: Rc<Self>, cancel: CancellationToken) -> Result<(), HostError> {
        let path = self.socket_dir.join(EVENT_SOCKET);
        let stream = UnixStream::connect(&path).await.map_err(|e| {
            error!(
                event = "core.host.event_socket_failed",
                path = %path.display(),
                error = %e
            );
            HostError::Unavailable {
                message: format!("Cannot open {}: {}", path.display(), e),
            }
        })?;

        info!(event = "core.host.event_pump_started", path = %path.display());
        let mut lines = BufReader::new(stream).lines();

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                warn!(event = "core.host.event_stream_closed");
                break;
            };

            let Some(event) = HyprEvent::parse(&line) else {
                continue;
            };

            self.invalidate();
            self.signals.emit(&*self, event.signal(), event.handle());
        }

        info!(event = "core.host.event_pump_stopped");
        Ok(())
    }
}

impl WindowSystem for HyprlandHost {
    fn windows(&self) -> Result<Vec<WindowHandle>, HostError> {
        self.refresh_clients()?;
        Ok(self
            .clients
            .borrow()
            .iter()
            .flatten()
            .filter_map(|c| parse_address(&c.address))
            .collect())
    }

    fn properties(&self, window: WindowHandle) -> Result<WindowProperties, HostError> {
        let client = match self.cached_client(window) {
            Some(client) => client,
            None => {
                self.refresh_clients()?;
                self.cached_client(window)
                    .ok_or(HostError::WindowGone { handle: window })?
            }
        };
        let monitor_ids = self.cached_monitor_ids()?;
        Ok(client_properties(&client, &monitor_ids))
    }

    fn monitors(&self) -> Result<Vec<MonitorInfo>, HostError> {
        Ok(monitor_infos(self.query_monitors()?))
    }

    fn has_workspace(&self, index: u32) -> bool {
        index < self.workspace_limit
    }

    fn move_to_workspace(&self, window: WindowHandle, index: u32) -> Result<(), HostError> {
        let target = format!("{},{}", index + 1, address_of(window));
        self.dispatch(&["movetoworkspacesilent", &target])
    }

    fn move_resize(&self, window: WindowHandle, frame: Geometry) -> Result<(), HostError> {
        let address = address_of(window);
        let position = format!("exact {} {},{}", frame.x, frame.y, address);
        let size = format!("exact {} {},{}", frame.width, frame.height, address);
        self.dispatch(&["resizewindowpixel", &size])?;
        self.dispatch(&["movewindowpixel", &position])
    }

    fn connect(&self, signal: WindowSignal, callback: SignalCallback) -> SignalId {
        self.signals.connect(signal, callback)
    }

    fn disconnect(&self, id: SignalId) {
        self.signals.disconnect(id);
    }
}
