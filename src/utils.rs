// SPDX-License-Identifier: Apache-2.0

//! Utility functions for uvkit — interpreter queries and small path helpers.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Query a Python executable for its version string.
///
/// Runs `<python_path> --version` and returns the trimmed version with the
/// leading `Python ` stripped (`"3.12.1"`). Older interpreters print to
/// stderr, so stdout and stderr are both consulted.
///
/// Returns `None` if the executable is absent or the invocation fails in any
/// way — version resolution is always non-fatal to the caller.
pub fn python_version(python_path: &Path) -> Option<String> {
    if !python_path.exists() {
        return None;
    }

    let output = Command::new(python_path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let raw = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).to_string()
    };

    let version = raw.trim().trim_start_matches("Python").trim().to_string();
    if version.is_empty() { None } else { Some(version) }
}

/// Directory for uvkit's own state (`~/.config/uvkit`), created on demand.
pub fn state_dir() -> PathBuf {
    let base = home::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join(".config/uvkit");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Attempts to identify the currently active interpreter.
///
/// Checks the recorded selection file first, then falls back to
/// `$VIRTUAL_ENV` (appending the conventional `bin/python`).
pub fn current_interpreter() -> Option<PathBuf> {
    let selection = state_dir().join("interpreter");
    if let Ok(content) = std::fs::read_to_string(&selection) {
        let line = content.trim();
        if !line.is_empty() {
            return Some(PathBuf::from(line));
        }
    }

    if let Ok(venv) = std::env::var("VIRTUAL_ENV")
        && !venv.is_empty()
    {
        return Some(PathBuf::from(venv).join("bin/python"));
    }

    None
}

/// Record an interpreter selection for `current_interpreter` to report.
pub fn record_interpreter(python_path: &Path) -> std::io::Result<()> {
    let selection = state_dir().join("interpreter");
    std::fs::write(selection, format!("{}\n", python_path.display()))
}

/// Expand a leading `~` to `$HOME` since `PathBuf` doesn't handle tilde.
pub fn expand_tilde(path: PathBuf) -> PathBuf {
    if path.starts_with("~")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(path.to_string_lossy().replacen('~', &home, 1));
    }
    path
}
