// SPDX-License-Identifier: Apache-2.0

//! Core types for uvkit — "Parse, Don't Validate" philosophy.
//!
//! `PythonEnvironment` is the record every other module consumes: built fresh
//! on each scan, never mutated in place, discarded when the next scan result
//! replaces it. `PackageName` enforces its invariants at construction time so
//! downstream code never needs to re-validate.

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Manager tag stamped on every record this crate produces.
pub const MANAGER_ID: &str = "uvkit:uv";

// =============================================================================
// EnvKind — how an environment was detected
// =============================================================================

/// Classification of a discovered environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvKind {
    /// A conventional virtual-environment directory (`.venv`).
    Venv,
    /// A project with `pyproject.toml` + `uv.lock` but no materialized venv.
    UvProject,
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Venv => write!(f, "venv"),
            Self::UvProject => write!(f, "uv-project"),
        }
    }
}

// =============================================================================
// PythonEnvironment — one discovered environment
// =============================================================================

/// A discovered Python environment.
///
/// `id` is the canonical filesystem path of the environment root (the venv
/// directory for `venv` records, the project directory for `uv-project`
/// records) and is unique within a single scan result.
///
/// `python_path` is where the interpreter is *expected* to live; it may not
/// exist on disk. `version` stays `None` unless resolution succeeded — it is
/// never a partial string.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonEnvironment {
    pub id: String,
    pub label: String,
    pub path: PathBuf,
    pub python_path: PathBuf,
    #[serde(rename = "type")]
    pub kind: EnvKind,
    pub manager: &'static str,
    /// Whether this environment matches the recorded interpreter selection.
    /// Best-effort only — not guaranteed synchronized with the shell.
    pub is_active: bool,
    pub version: Option<String>,
    /// The owning project directory (where `pyproject.toml` is looked up).
    pub project_root: PathBuf,
}

impl PythonEnvironment {
    /// Build a record for a venv directory inside `project_root`.
    pub fn venv(name: &str, venv_dir: PathBuf, project_root: PathBuf) -> Self {
        let python_path = venv_dir.join("bin/python");
        Self {
            id: venv_dir.to_string_lossy().to_string(),
            label: format!("{} (.venv)", name),
            path: venv_dir,
            python_path,
            kind: EnvKind::Venv,
            manager: MANAGER_ID,
            is_active: false,
            version: None,
            project_root,
        }
    }

    /// Build a record for a uv project root with no materialized venv.
    ///
    /// The interpreter is expected at `<dir>/bin/python`, mirroring how the
    /// project root itself stands in for the environment directory.
    pub fn uv_project(name: &str, dir: PathBuf) -> Self {
        let python_path = dir.join("bin/python");
        Self {
            id: dir.to_string_lossy().to_string(),
            label: format!("{} (uv)", name),
            path: dir.clone(),
            python_path,
            kind: EnvKind::UvProject,
            manager: MANAGER_ID,
            is_active: false,
            version: None,
            project_root: dir,
        }
    }

    /// Build the distinguished record for a workspace-root `.venv`.
    pub fn workspace_venv(venv_dir: PathBuf, workspace_root: PathBuf) -> Self {
        let python_path = venv_dir.join("bin/python");
        Self {
            id: venv_dir.to_string_lossy().to_string(),
            label: "workspace (.venv)".to_string(),
            path: venv_dir,
            python_path,
            kind: EnvKind::Venv,
            manager: MANAGER_ID,
            is_active: false,
            version: None,
            project_root: workspace_root,
        }
    }

    /// Suffix the label with the resolved version, e.g. `app (.venv) [3.12.1]`.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        if let Some(ref v) = version {
            self.label = format!("{} [{}]", self.label, v);
        }
        self.version = version;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

// =============================================================================
// PackageName — validated package argument for install/uninstall
// =============================================================================

/// A validated package requirement string.
///
/// Guarantees:
/// - Non-empty, trimmed
/// - No path separators (`/`, `\`), no `..`
/// - No shell metacharacters (`;|&$` etc.)
/// - Max 128 characters
///
/// Version specifiers are allowed (`requests>=2.31`), so `<>=!~[],.` pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

/// Errors that can occur when parsing a package name.
#[derive(Debug, Clone)]
pub struct PackageNameError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for PackageNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid package name '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for PackageNameError {}

impl PackageName {
    /// Create a new `PackageName` from a string, validating all invariants.
    pub fn new(name: impl Into<String>) -> Result<Self, PackageNameError> {
        let raw = name.into();
        let trimmed = raw.trim().to_string();

        if trimmed.is_empty() {
            return Err(PackageNameError {
                input: raw,
                reason: "cannot be empty",
            });
        }

        if trimmed.len() > 128 {
            return Err(PackageNameError {
                input: trimmed,
                reason: "too long (max 128 characters)",
            });
        }

        if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
            return Err(PackageNameError {
                input: trimmed,
                reason: "cannot contain path characters",
            });
        }

        const FORBIDDEN: &[char] = &[
            ';', '|', '&', '$', '`', '(', ')', '"', '\'', '\n', '\r', '\0', ' ',
        ];
        if trimmed.chars().any(|c| FORBIDDEN.contains(&c)) {
            return Err(PackageNameError {
                input: trimmed,
                reason: "contains shell metacharacters",
            });
        }

        Ok(Self(trimmed))
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for PackageName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = PackageNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// =============================================================================
// UvError — failure taxonomy
// =============================================================================

/// Failure taxonomy for every operation in this crate.
///
/// Malformed external output is deliberately absent: it downgrades to an
/// empty result instead of surfacing as an error.
#[derive(Debug)]
pub enum UvError {
    /// A required environment path is absent. Aborts the operation, no retry.
    EnvironmentNotFound(PathBuf),
    /// An external tool spawned with a nonzero exit or failed to spawn.
    /// `detail` carries the captured error stream.
    ProcessFailure { program: String, detail: String },
    /// No workspace folder, or the folder is not a directory.
    MissingWorkspace(PathBuf),
    /// Filesystem error while scanning (e.g. unreadable directory).
    Io(std::io::Error),
}

impl UvError {
    pub fn process(program: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ProcessFailure {
            program: program.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::EnvironmentNotFound(path.as_ref().to_path_buf())
    }
}

impl fmt::Display for UvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentNotFound(path) => {
                write!(f, "Environment not found at {}", path.display())
            }
            Self::ProcessFailure { program, detail } => {
                let detail = detail.trim();
                if detail.is_empty() {
                    write!(f, "'{}' failed", program)
                } else {
                    write!(f, "'{}' failed: {}", program, detail)
                }
            }
            Self::MissingWorkspace(path) => {
                write!(f, "No workspace folder at {}", path.display())
            }
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for UvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for UvError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// =============================================================================
// Tests
// =============================================================================
