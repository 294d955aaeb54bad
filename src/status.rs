// SPDX-License-Identifier: Apache-2.0

//! Status-bar adapter: a single-condition summary of the primary workspace
//! folder, recomputed from scratch on every invocation.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::utils;

/// The one-line environment readout.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum StatusSummary {
    /// The primary folder carries a complete uv setup: venv directory,
    /// `uv.lock`, and `pyproject.toml` all present, with an interpreter
    /// inside the venv.
    #[serde(rename_all = "camelCase")]
    Active {
        python_path: PathBuf,
        /// `None` when the interpreter exists but the version query failed.
        version: Option<String>,
    },
    /// Anything less than the full conjunction above.
    NoEnvironment,
}

impl std::fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active { version, .. } => {
                write!(f, "uv env: {}", version.as_deref().unwrap_or("unknown"))
            }
            Self::NoEnvironment => write!(f, "no uv environment"),
        }
    }
}

/// Summarize the primary workspace folder.
///
/// The condition is deliberately strict: venv dir AND lock file AND marker
/// file, simultaneously; partial setups report `NoEnvironment`.
pub fn summarize(primary_root: &Path, config: &Config) -> StatusSummary {
    let venv = primary_root.join(&config.venv_path);
    let lock = primary_root.join("uv.lock");
    let marker = primary_root.join("pyproject.toml");

    if !(venv.is_dir() && lock.exists() && marker.exists()) {
        return StatusSummary::NoEnvironment;
    }

    let python_path = venv.join("bin/python");
    if !python_path.exists() {
        return StatusSummary::NoEnvironment;
    }

    let version = utils::python_version(&python_path);
    StatusSummary::Active {
        python_path,
        version,
    }
}
