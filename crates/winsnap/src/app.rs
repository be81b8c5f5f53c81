use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("winsnap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Save and restore desktop window layouts")
        .long_about("winsnap records where your application windows are (workspace, monitor, geometry and the command that started them) into named sessions, and restores a session later by reusing running windows or relaunching their applications.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Read configuration from this file instead of the default location")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("sessions-dir")
                .long("sessions-dir")
                .help("Directory holding saved sessions (overrides config)")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("save")
                .about("Save the current window layout as a named session")
                .arg(
                    Arg::new("name")
                        .help("Session name")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List saved sessions")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show the windows recorded in a session")
                .arg(
                    Arg::new("session")
                        .help("Session name or file name")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the stored document")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("restore")
                .about("Restore a saved session")
                .arg(
                    Arg::new("session")
                        .help("Session name or file name")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("Milliseconds to wait for each launched window (overrides config)")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("geometry")
                        .long("geometry")
                        .help("Also restore each window's recorded position and size")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the restore report in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a saved session")
                .arg(
                    Arg::new("session")
                        .help("Session name or file name")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                        .index(1),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_save_requires_name() {
        let result = build_cli().try_get_matches_from(vec!["winsnap", "save"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_json_flag() {
        let matches = build_cli()
            .try_get_matches_from(vec!["winsnap", "list", "--json"])
            .unwrap();
        let list = matches.subcommand_matches("list").unwrap();
        assert!(list.get_flag("json"));
    }

    #[test]
    fn test_restore_timeout_parsed() {
        let matches = build_cli()
            .try_get_matches_from(vec!["winsnap", "restore", "work", "--timeout", "2500"])
            .unwrap();
        let restore = matches.subcommand_matches("restore").unwrap();
        assert_eq!(restore.get_one::<u64>("timeout"), Some(&2500));
        assert_eq!(
            restore.get_one::<String>("session").map(String::as_str),
            Some("work")
        );
    }

    #[test]
    fn test_restore_rejects_zero_timeout() {
        let result =
            build_cli().try_get_matches_from(vec!["winsnap", "restore", "work", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(vec!["winsnap", "list", "-v", "--sessions-dir", "/tmp/s"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        assert_eq!(
            matches.get_one::<std::path::PathBuf>("sessions-dir"),
            Some(&std::path::PathBuf::from("/tmp/s"))
        );
    }

    #[test]
    fn test_completions_shell() {
        let matches = build_cli()
            .try_get_matches_from(vec!["winsnap", "completions", "bash"])
            .unwrap();
        let sub = matches.subcommand_matches("completions").unwrap();
        assert_eq!(sub.get_one::<Shell>("shell"), Some(&Shell::Bash));
    }
}
