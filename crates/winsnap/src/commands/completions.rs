use std::io::Write;

use clap::ArgMatches;
use clap_complete::Shell;
use tracing::info;

use crate::app::build_cli;

const BIN_NAME: &str = "winsnap";

pub(crate) fn handle_completions_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let shell = *matches
        .get_one::<Shell>("shell")
        .ok_or("Shell argument is required")?;

    let mut stdout = std::io::stdout().lock();
    write_completions(shell, &mut stdout)?;
    stdout.flush()?;

    info!(event = "cli.completions_completed", shell = %shell);
    Ok(())
}

/// Render the completion script for `shell` into `out`.
fn write_completions(shell: Shell, out: &mut dyn Write) -> std::io::Result<()> {
    let mut cmd = build_cli();
    let mut script = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut script);
    out.write_all(&script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_lists_session_commands() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();

        for subcommand in ["save", "list", "show", "restore", "delete"] {
            assert!(script.contains(subcommand), "missing {}", subcommand);
        }
        assert!(script.contains("--sessions-dir"));
    }

    #[test]
    fn test_zsh_script_names_binary() {
        let mut out = Vec::new();
        write_completions(Shell::Zsh, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("#compdef winsnap"));
    }
}
