//! Application descriptor (`.desktop` file) lookup.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::windows::Fingerprint;

const DESKTOP_ENTRY_GROUP: &str = "[Desktop Entry]";

/// The keys of a descriptor's `[Desktop Entry]` group that matter for launch
/// matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    pub exec: Option<String>,
    pub startup_wm_class: Option<String>,
    pub hidden: bool,
}

impl DesktopEntry {
    /// Parse `Key=Value` lines of the `[Desktop Entry]` group. Other groups,
    /// comments and localized keys are ignored.
    pub fn parse(content: &str) -> Self {
        let mut entry = DesktopEntry::default();
        let mut in_entry_group = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_entry_group = line == DESKTOP_ENTRY_GROUP;
                continue;
            }
            if !in_entry_group {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "Exec" if !value.is_empty() => entry.exec = Some(value.to_string()),
                "StartupWMClass" if !value.is_empty() => {
                    entry.startup_wm_class = Some(value.to_string())
                }
                "Hidden" => entry.hidden = value == "true",
                _ => {}
            }
        }

        entry
    }

    /// Basename of the program the `Exec` line runs.
    pub fn exec_name(&self) -> Option<String> {
        let program = exec_program(self.exec.as_deref()?)?;
        Some(basename(&program).to_string())
    }

    pub fn matches(&self, app_name: &str, wm_class: &str) -> bool {
        if self.hidden {
            return false;
        }

        let exec_matches = !app_name.is_empty()
            && self
                .exec_name()
                .is_some_and(|name| name.to_lowercase() == app_name.to_lowercase());

        let class_matches = !wm_class.is_empty()
            && self.startup_wm_class.as_deref() == Some(wm_class);

        exec_matches || class_matches
    }
}

/// First word of an `Exec` value, with double quotes and backslash escapes
/// removed.
fn exec_program(exec: &str) -> Option<String> {
    let mut program = String::new();
    let mut in_quotes = false;
    let mut chars = exec.trim_start().chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' => {
                if let Some(escaped) = chars.next() {
                    program.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quotes => break,
            c => program.push(c),
        }
    }

    if program.is_empty() {
        None
    } else {
        Some(program)
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Name used to look up a window's application: the basename of argv[0],
/// else the window class.
pub fn candidate_app_name(fingerprint: &Fingerprint) -> String {
    match fingerprint.command_line().and_then(|args| args.first()) {
        Some(program) => basename(program).to_string(),
        None => fingerprint.wm_class().to_string(),
    }
}

/// Scans descriptor directories in order for a window's application.
#[derive(Debug, Clone)]
pub struct DescriptorResolver {
    dirs: Vec<PathBuf>,
}

impl DescriptorResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Path of the first descriptor matching `fingerprint`.
    pub fn find(&self, fingerprint: &Fingerprint) -> Option<PathBuf> {
        let app_name = candidate_app_name(fingerprint);
        let wm_class = fingerprint.wm_class();

        self.dirs
            .iter()
            .find_map(|dir| find_in_dir(dir, &app_name, wm_class))
    }
}

fn find_in_dir(dir: &Path, app_name: &str, wm_class: &str) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                event = "core.restore.descriptor_dir_unreadable",
                dir = %dir.display(),
                error = %e
            );
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("desktop"))
        // Follows symlinks: exported descriptors are usually links.
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();

    candidates.into_iter().find(|path| match fs::read_to_string(path) {
        Ok(content) => DesktopEntry::parse(&content).matches(app_name, wm_class),
        Err(e) => {
            warn!(
                event = "core.restore.descriptor_read_failed",
                file = %path.display(),
                error = %e,
                "Failed to read application descriptor, skipping"
            );
            false
        }
    })
}
