//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! Every test points the CLI at a private sessions directory and an empty
//! config file so the user's own setup is never read.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
        Self { dir }
    }

    fn sessions_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("sessions")
    }

    fn write_session(&self, filename: &str, content: &str) {
        std::fs::create_dir_all(self.sessions_dir()).expect("Failed to create sessions dir");
        std::fs::write(self.sessions_dir().join(filename), content)
            .expect("Failed to write session");
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.dir.path().join("config.toml");
        Command::new(env!("CARGO_BIN_EXE_winsnap"))
            .args(args)
            .arg("--config")
            .arg(&config)
            .arg("--sessions-dir")
            .arg(self.sessions_dir())
            .output()
            .expect("Failed to execute winsnap")
    }
}

const SESSION: &str = r#"{
  "name": "Work Setup",
  "timestamp": "2026-03-01T09:30:00Z",
  "monitors": [
    {"index": 0, "width": 1920, "height": 1080, "x": 0, "y": 0, "is_primary": true, "scale": 1.0}
  ],
  "windows": [
    {
      "fingerprint": {"pid": 4242, "wmClass": "firefox", "stableSequence": 12, "title": "Mozilla Firefox", "cmdLine": ["/usr/lib/firefox/firefox"]},
      "monitor": 0,
      "workspace": 1,
      "geometry": {"x": 0, "y": 0, "width": 1280, "height": 1024},
      "state": {"minimized": false, "maximized": 3, "above": false, "sticky": false}
    }
  ]
}"#;

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed with exit code {:?}. stderr: {}",
        what,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_no_json_lines(stdout: &str) {
    for line in stdout.lines() {
        assert!(
            !line.trim().starts_with('{'),
            "stdout contains JSON line: {}",
            line
        );
    }
}

#[test]
fn test_list_stdout_is_clean() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list"]);
    assert_success(&output, "winsnap list");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
    assert!(
        stdout.contains("No saved sessions found."),
        "stdout should contain user-facing list output, got: {}",
        stdout
    );
}

#[test]
fn test_list_shows_saved_sessions() {
    let sandbox = Sandbox::new();
    sandbox.write_session("Work_Setup.json", SESSION);
    sandbox.write_session("notes.txt", "ignored");

    let output = sandbox.run(&["list"]);
    assert_success(&output, "winsnap list");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Saved sessions:"), "got: {}", stdout);
    assert!(stdout.contains("Work_Setup.json"), "got: {}", stdout);
    assert!(!stdout.contains("notes.txt"), "got: {}", stdout);
    assert_no_json_lines(&stdout);
}

#[test]
fn test_list_json_output() {
    let sandbox = Sandbox::new();
    sandbox.write_session("Work_Setup.json", SESSION);

    let output = sandbox.run(&["list", "--json"]);
    assert_success(&output, "winsnap list --json");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list --json should print JSON");
    assert_eq!(value[0]["name"], "Work_Setup");
    assert_eq!(value[0]["filename"], "Work_Setup.json");
    assert!(
        Path::new(value[0]["path"].as_str().unwrap_or_default()).ends_with("Work_Setup.json")
    );
}

#[test]
fn test_show_by_session_name() {
    let sandbox = Sandbox::new();
    sandbox.write_session("Work_Setup.json", SESSION);

    let output = sandbox.run(&["show", "Work Setup"]);
    assert_success(&output, "winsnap show");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Session: Work Setup"), "got: {}", stdout);
    assert!(stdout.contains("Mozilla Firefox"), "got: {}", stdout);
    assert!(stdout.contains("/usr/lib/firefox/firefox"), "got: {}", stdout);
}

#[test]
fn test_show_missing_session_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["show", "nope"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "got: {}", stderr);
}

#[test]
fn test_delete_removes_session() {
    let sandbox = Sandbox::new();
    sandbox.write_session("Work_Setup.json", SESSION);

    let output = sandbox.run(&["delete", "Work_Setup.json"]);
    assert_success(&output, "winsnap delete");
    assert!(!sandbox.sessions_dir().join("Work_Setup.json").exists());
}

#[test]
fn test_verbose_flag_emits_info_logs() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["-v", "list"]);
    assert_success(&output, "winsnap -v list");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs, but stderr is: {}",
        stderr
    );
    assert_no_json_lines(&String::from_utf8_lossy(&output.stdout));
}

#[test]
fn test_verbose_flag_after_subcommand() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list", "--verbose"]);
    assert_success(&output, "winsnap list --verbose");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Global verbose flag should work after the subcommand, but stderr is: {}",
        stderr
    );
}

#[test]
fn test_completions_generate_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_winsnap"))
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute 'winsnap completions bash'");
    assert_success(&output, "winsnap completions bash");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("winsnap"), "got: {}", stdout);
}
