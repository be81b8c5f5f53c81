use std::process::{Command, Stdio};

use tracing::{debug, error, info};

use super::errors::ProcessError;

/// Starts processes without waiting for them.
pub trait ProcessSpawner {
    /// Spawn `argv` detached from the caller. Returns the child's pid.
    fn spawn(&self, argv: &[String]) -> Result<u32, ProcessError>;
}

/// [`ProcessSpawner`] using `std::process::Command`.
///
/// Children get their own process group and null stdio so they outlive the
/// CLI. A background thread reaps each child when it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandSpawner;

impl ProcessSpawner for CommandSpawner {
    fn spawn(&self, argv: &[String]) -> Result<u32, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        if program.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn().map_err(|e| {
            error!(
                event = "core.process.spawn_failed",
                program = %program,
                error = %e
            );
            ProcessError::SpawnFailed {
                program: program.clone(),
                message: e.to_string(),
            }
        })?;

        let pid = child.id();
        info!(
            event = "core.process.spawn_completed",
            program = %program,
            pid = pid
        );

        std::thread::spawn(move || {
            let status = child.wait();
            debug!(event = "core.process.child_reaped", pid = pid, status = ?status);
        });

        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argv_rejected() {
        let result = CommandSpawner.spawn(&[]);
        assert!(matches!(result, Err(ProcessError::EmptyCommand)));
    }

    #[test]
    fn test_missing_program_reports_spawn_failure() {
        let argv = vec!["/nonexistent/winsnap-test-binary".to_string()];
        let result = CommandSpawner.spawn(&argv);
        assert!(matches!(result, Err(ProcessError::SpawnFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_true_returns_pid() {
        let argv = vec!["true".to_string()];
        let pid = CommandSpawner.spawn(&argv).unwrap();
        assert!(pid > 0);
    }
}
