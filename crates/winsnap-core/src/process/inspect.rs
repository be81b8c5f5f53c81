use sysinfo::{Pid as SysinfoPid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// Reads a process's argv by pid.
pub trait ProcessInspector {
    /// The process's command line, or `None` when it is unreadable, empty,
    /// or the process has exited.
    fn command_line(&self, pid: i32) -> Option<Vec<String>>;
}

/// [`ProcessInspector`] backed by the OS process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoInspector;

impl ProcessInspector for SysinfoInspector {
    fn command_line(&self, pid: i32) -> Option<Vec<String>> {
        read_command_line(pid)
    }
}

/// Read the command line of `pid` from the process table.
pub fn read_command_line(pid: i32) -> Option<Vec<String>> {
    let raw_pid = u32::try_from(pid).ok().filter(|p| *p != 0)?;
    let pid_obj = SysinfoPid::from_u32(raw_pid);

    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid_obj]),
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
    );

    let Some(process) = system.process(pid_obj) else {
        debug!(event = "core.process.cmdline_process_missing", pid = pid);
        return None;
    };

    let args: Vec<String> = process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .filter(|arg| !arg.is_empty())
        .collect();

    if args.is_empty() {
        debug!(event = "core.process.cmdline_empty", pid = pid);
        return None;
    }

    Some(args)
}
