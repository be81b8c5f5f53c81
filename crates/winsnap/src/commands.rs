use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use winsnap_core::config::WinsnapConfig;
use winsnap_core::events;
use winsnap_core::host::{HyprlandHost, WindowSystem};
use winsnap_core::restore::RestoreReport;
use winsnap_core::service::resolve_sessions_dir;
use winsnap_core::snapshot::{Snapshot, snapshot_filename};
use winsnap_core::{SnapshotService, SnapshotStore};

use crate::table::TableFormatter;

mod completions;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if loading or validation fails, but notifies the
/// user on stderr and logs `cli.config.load_failed`.
fn load_config_with_warning(path: Option<&PathBuf>) -> WinsnapConfig {
    let loaded = match path {
        Some(path) => WinsnapConfig::load_from(path),
        None => WinsnapConfig::load_hierarchy(),
    };

    match loaded.and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.config/winsnap/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            WinsnapConfig::default()
        }
    }
}

/// Accept either a session name or its stored file name.
fn session_filename(session: &str) -> String {
    if session.ends_with(".json") {
        session.to_string()
    } else {
        snapshot_filename(session)
    }
}

fn sessions_dir_arg(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>("sessions-dir").cloned()
}

fn open_store(
    matches: &ArgMatches,
    config: &WinsnapConfig,
) -> Result<SnapshotStore, Box<dyn std::error::Error>> {
    let dir = resolve_sessions_dir(config, sessions_dir_arg(matches))?;
    Ok(SnapshotStore::new(dir))
}

fn connect_host(config: &WinsnapConfig) -> Result<Rc<HyprlandHost>, Box<dyn std::error::Error>> {
    HyprlandHost::connect(config.hyprland.workspace_limit()).map_err(|e| {
        eprintln!("Cannot reach the window manager: {}", e);
        error!(event = "cli.host_connect_failed", error = %e);
        events::log_app_error(&e);
        e.into()
    })
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_app_startup(command);

    let result = match matches.subcommand() {
        Some(("save", sub_matches)) => handle_save_command(sub_matches),
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("show", sub_matches)) => handle_show_command(sub_matches),
        Some(("restore", sub_matches)) => handle_restore_command(sub_matches),
        Some(("delete", sub_matches)) => handle_delete_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command, result.is_ok());
    result
}

fn handle_save_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = matches
        .get_one::<String>("name")
        .ok_or("Session name is required")?;

    info!(event = "cli.save_started", name = name);

    let config = load_config_with_warning(matches.get_one::<PathBuf>("config"));
    let host = connect_host(&config)?;
    let service = SnapshotService::from_config(host, &config, sessions_dir_arg(matches))?;

    match service.capture_session(name) {
        Ok((snapshot, path)) => {
            let count = snapshot.windows.len();
            println!("Saved session '{}' ({} windows)", name, count);
            println!("  File: {}", path.display());

            info!(
                event = "cli.save_completed",
                name = name,
                path = %path.display(),
                windows = count
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to save session '{}': {}", name, e);
            error!(event = "cli.save_failed", name = name, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.list_started", json_output = json_output);

    let config = load_config_with_warning(matches.get_one::<PathBuf>("config"));
    let store = open_store(matches, &config)?;

    match store.list_sessions() {
        Ok(sessions) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No saved sessions found.");
            } else {
                println!("Saved sessions:");
                let rows: Vec<Vec<String>> = sessions
                    .iter()
                    .map(|s| vec![s.name.clone(), s.filename.clone()])
                    .collect();
                TableFormatter::new(&["Name", "File"], &[40, 44], &rows).print_table(&rows);
            }

            info!(event = "cli.list_completed", count = sessions.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to list sessions: {}", e);
            error!(event = "cli.list_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("Session: {}", snapshot.name);
    println!("  Saved:    {}", snapshot.timestamp.to_rfc3339());
    println!("  Monitors: {}", snapshot.monitors.len());
    println!("  Windows:  {}", snapshot.windows.len());

    if snapshot.windows.is_empty() {
        return;
    }

    let rows: Vec<Vec<String>> = snapshot
        .windows
        .iter()
        .map(|w| {
            vec![
                w.fingerprint.title().to_string(),
                w.fingerprint.wm_class().to_string(),
                w.workspace.map_or("all".to_string(), |ws| ws.to_string()),
                w.monitor.to_string(),
                w.fingerprint
                    .command_line()
                    .map_or("-".to_string(), |args| args.join(" ")),
            ]
        })
        .collect();

    TableFormatter::new(
        &["Title", "Class", "Workspace", "Monitor", "Command"],
        &[36, 20, 9, 7, 40],
        &rows,
    )
    .print_table(&rows);
}

fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let session = matches
        .get_one::<String>("session")
        .ok_or("Session argument is required")?;
    let json_output = matches.get_flag("json");
    let filename = session_filename(session);

    info!(event = "cli.show_started", filename = %filename);

    let config = load_config_with_warning(matches.get_one::<PathBuf>("config"));
    let store = open_store(matches, &config)?;

    match store.load_session(&filename) {
        Ok(snapshot) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot);
            }
            info!(event = "cli.show_completed", filename = %filename);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to load session '{}': {}", session, e);
            error!(event = "cli.show_failed", filename = %filename, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_report(report: &RestoreReport) {
    let rows: Vec<Vec<String>> = report
        .outcomes
        .iter()
        .map(|o| {
            vec![
                o.title.clone(),
                o.wm_class.clone(),
                o.outcome.to_string(),
                o.reason.clone().unwrap_or_default(),
            ]
        })
        .collect();

    if !rows.is_empty() {
        TableFormatter::new(&["Title", "Class", "Outcome", "Reason"], &[36, 20, 8, 36], &rows)
            .print_table(&rows);
    }

    println!(
        "Restored {}/{} windows for session '{}'",
        report.success_count(),
        report.len(),
        report.session
    );
}

fn handle_restore_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let session = matches
        .get_one::<String>("session")
        .ok_or("Session argument is required")?;
    let json_output = matches.get_flag("json");
    let filename = session_filename(session);

    info!(event = "cli.restore_started", filename = %filename);

    let mut config = load_config_with_warning(matches.get_one::<PathBuf>("config"));
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.restore.window_timeout_ms = Some(*timeout);
    }
    if matches.get_flag("geometry") {
        config.restore.restore_geometry = true;
    }

    let store = open_store(matches, &config)?;
    let snapshot = match store.load_session(&filename) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to load session '{}': {}", session, e);
            error!(event = "cli.restore_failed", filename = %filename, error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };

    let host = connect_host(&config)?;
    let window_system: Rc<dyn WindowSystem> = host.clone();
    let service = SnapshotService::new(
        window_system,
        Rc::new(winsnap_core::process::SysinfoInspector),
        Rc::new(winsnap_core::process::CommandSpawner),
        store,
        winsnap_core::restore::RestoreSettings::from(&config.restore),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    let report = local.block_on(&runtime, async {
        let cancel = CancellationToken::new();

        let pump = tokio::task::spawn_local(Rc::clone(&host).run_event_pump(cancel.clone()));
        // Let the pump connect before the first registry poll.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let interrupt = cancel.clone();
        tokio::task::spawn_local(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted, skipping remaining windows...");
                warn!(event = "cli.restore_interrupted");
                interrupt.cancel();
            }
        });

        let report = service.launch_session(&snapshot, &cancel).await;

        cancel.cancel();
        match pump.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("Warning: window events were unavailable: {}", e);
                warn!(event = "cli.event_pump_failed", error = %e);
            }
            Err(e) => warn!(event = "cli.event_pump_failed", error = %e),
        }

        report
    });

    service.shutdown();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    info!(
        event = "cli.restore_completed",
        filename = %filename,
        restored = report.success_count(),
        total = report.len()
    );
    Ok(())
}

fn handle_delete_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let session = matches
        .get_one::<String>("session")
        .ok_or("Session argument is required")?;
    let filename = session_filename(session);

    info!(event = "cli.delete_started", filename = %filename);

    let config = load_config_with_warning(matches.get_one::<PathBuf>("config"));
    let store = open_store(matches, &config)?;

    match store.delete_session(&filename) {
        Ok(()) => {
            println!("Deleted session '{}'", session);
            info!(event = "cli.delete_completed", filename = %filename);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to delete session '{}': {}", session, e);
            error!(event = "cli.delete_failed", filename = %filename, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
