// SPDX-License-Identifier: Apache-2.0

//! Environment discovery.
//!
//! The scan is a bounded heuristic, not a crawl: immediate subdirectories of
//! the workspace root only, plus the root's own `.venv`. Results are built
//! fresh on every call — there is no cache and no staleness guarantee.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::types::{PythonEnvironment, UvError};
use crate::utils;

/// Scan a workspace folder for Python environments.
///
/// Classification per candidate subdirectory:
/// - a `.venv` child directory → `venv`
/// - otherwise `pyproject.toml` + `uv.lock` together → `uv-project`
///
/// The workspace root's own `.venv` is always checked and reported as the
/// distinguished `workspace (.venv)` record.
///
/// An unreadable workspace root aborts the scan; a missing or failing Python
/// executable only leaves `version` unresolved. Order of the returned records
/// is not significant — consumers sort or group for display.
pub fn scan_workspace(
    root: &Path,
    selected_interpreter: Option<&Path>,
) -> Result<Vec<PythonEnvironment>, UvError> {
    if !root.is_dir() {
        return Err(UvError::MissingWorkspace(root.to_path_buf()));
    }

    let mut candidates: Vec<PythonEnvironment> = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| match e.into_io_error() {
            Some(io) => UvError::Io(io),
            None => UvError::MissingWorkspace(root.to_path_buf()),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path().to_path_buf();
        let name = entry.file_name().to_string_lossy().to_string();

        let venv = dir.join(".venv");
        if venv.is_dir() {
            candidates.push(PythonEnvironment::venv(&name, venv, dir));
        } else if dir.join("pyproject.toml").exists() && dir.join("uv.lock").exists() {
            candidates.push(PythonEnvironment::uv_project(&name, dir));
        }
    }

    // The workspace root itself may carry the environment.
    let root_venv = root.join(".venv");
    if root_venv.is_dir() {
        candidates.push(PythonEnvironment::workspace_venv(
            root_venv,
            root.to_path_buf(),
        ));
    }

    // Version resolution shells out once per candidate; fan out in parallel.
    // Failures are non-fatal — the record simply keeps `version: None`.
    let envs = candidates
        .into_par_iter()
        .map(|env| {
            let version = utils::python_version(&env.python_path);
            let active = selected_interpreter.is_some_and(|sel| sel == env.python_path);
            env.with_version(version).with_active(active)
        })
        .collect();

    Ok(envs)
}

/// Scan several workspace folders, concatenating their records.
pub fn scan_all(
    roots: &[PathBuf],
    selected_interpreter: Option<&Path>,
) -> Result<Vec<PythonEnvironment>, UvError> {
    let mut all = Vec::new();
    for root in roots {
        all.extend(scan_workspace(root, selected_interpreter)?);
    }
    Ok(all)
}
