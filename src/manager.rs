// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Config;
use crate::pyproject;
use crate::scanner;
use crate::types::{PackageName, PythonEnvironment, UvError};
use crate::utils;

/// Stateless façade over the `uv` binary.
///
/// Every operation is a single external-tool invocation plus outcome
/// translation. There is no queue and no dedup of concurrent calls against
/// the same environment — two overlapping installs are not coordinated.
pub struct UvManager {
    config: Config,
}

/// One entry of `uv pip list --format json` output.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

impl UvManager {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locate the `uv` binary on PATH.
    fn uv(&self) -> Result<PathBuf, UvError> {
        which::which("uv").map_err(|_| UvError::process("uv", "not found on PATH"))
    }

    /// List environments in a workspace folder. Scanner errors propagate.
    pub fn list(&self, root: &Path) -> Result<Vec<PythonEnvironment>, UvError> {
        scanner::scan_workspace(root, utils::current_interpreter().as_deref())
    }

    /// Create a new environment with `uv venv`.
    ///
    /// On nonzero exit the captured stderr is surfaced and nothing is
    /// retried. On success a fresh record (with resolved version when
    /// possible) is returned.
    pub fn create(
        &self,
        location: &Path,
        python: Option<&str>,
    ) -> Result<PythonEnvironment, UvError> {
        if location.exists() {
            return Err(UvError::process(
                "uv",
                format!("{} already exists", location.display()),
            ));
        }

        let uv = self.uv()?;
        let cwd = location.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(cwd)?;

        let mut cmd = Command::new(&uv);
        cmd.arg("venv").arg(location).current_dir(cwd);
        if let Some(version) = python.filter(|v| !v.is_empty()) {
            cmd.arg("--python").arg(version);
        }

        let output = cmd
            .output()
            .map_err(|e| UvError::process("uv", e.to_string()))?;
        if !output.status.success() {
            return Err(UvError::process(
                "uv venv",
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "venv".to_string());
        let project_root = cwd.to_path_buf();
        let env = PythonEnvironment::venv(&name, location.to_path_buf(), project_root);
        let version = utils::python_version(&env.python_path);
        Ok(env.with_version(version))
    }

    /// Delete an environment directory tree (recursive, force).
    ///
    /// A non-existent path is a no-op, not an error.
    pub fn delete(&self, env: &PythonEnvironment) -> Result<(), UvError> {
        if env.path.exists() {
            std::fs::remove_dir_all(&env.path)?;
        }
        Ok(())
    }

    /// Record this environment's interpreter as the active selection.
    ///
    /// Returns `false` (no-op) when the interpreter does not exist on disk.
    pub fn activate(&self, env: &PythonEnvironment) -> Result<bool, UvError> {
        if !env.python_path.exists() {
            return Ok(false);
        }
        utils::record_interpreter(&env.python_path)?;
        Ok(true)
    }

    /// List installed packages via `uv pip list --format json`.
    ///
    /// Any failure — spawn error, nonzero exit, malformed JSON — yields an
    /// empty list rather than an error.
    pub fn list_packages(&self, env: &PythonEnvironment) -> Vec<PackageInfo> {
        let Ok(uv) = self.uv() else {
            return Vec::new();
        };
        let Ok(output) = Command::new(&uv)
            .args(["pip", "list", "--format", "json"])
            .current_dir(&env.path)
            .output()
        else {
            return Vec::new();
        };
        if !output.status.success() {
            return Vec::new();
        }

        serde_json::from_slice(&output.stdout).unwrap_or_default()
    }

    /// Install a package with `uv pip install`.
    pub fn install_package(
        &self,
        env: &PythonEnvironment,
        pkg: &PackageName,
    ) -> Result<(), UvError> {
        self.pip_op(env, &["pip", "install", pkg.as_str()])
    }

    /// Uninstall a package with `uv pip uninstall`.
    pub fn uninstall_package(
        &self,
        env: &PythonEnvironment,
        pkg: &PackageName,
    ) -> Result<(), UvError> {
        self.pip_op(env, &["pip", "uninstall", "-y", pkg.as_str()])
    }

    fn pip_op(&self, env: &PythonEnvironment, args: &[&str]) -> Result<(), UvError> {
        if !env.path.exists() {
            return Err(UvError::not_found(&env.path));
        }

        let uv = self.uv()?;
        let output = Command::new(&uv)
            .args(args)
            .current_dir(&env.path)
            .output()
            .map_err(|e| UvError::process("uv", e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(UvError::process(
                format!("uv {}", args.join(" ")),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    /// Match a CLI selector against scan records.
    ///
    /// Tries, in order: exact id/path, exact label, project directory name,
    /// then label substring.
    pub fn resolve<'a>(
        &self,
        records: &'a [PythonEnvironment],
        needle: &str,
    ) -> Option<&'a PythonEnvironment> {
        records
            .iter()
            .find(|e| e.id == needle || e.path == Path::new(needle))
            .or_else(|| records.iter().find(|e| e.label == needle))
            .or_else(|| {
                records
                    .iter()
                    .find(|e| e.project_root.file_name().is_some_and(|n| n == needle))
            })
            .or_else(|| records.iter().find(|e| e.label.contains(needle)))
    }

    /// Dependency names declared in `pyproject.toml` but absent from
    /// `uv.lock` (substring check, no structured lock parsing).
    pub fn lock_drift(&self, project_root: &Path) -> Result<Vec<String>, UvError> {
        let pyproject = project_root.join("pyproject.toml");
        let lock = project_root.join("uv.lock");
        if !pyproject.exists() {
            return Err(UvError::not_found(&pyproject));
        }
        if !lock.exists() {
            return Err(UvError::not_found(&lock));
        }

        let pyproject_content = std::fs::read_to_string(&pyproject)?;
        let lock_content = std::fs::read_to_string(&lock)?;

        Ok(pyproject::parse_dependency_names(&pyproject_content)
            .into_iter()
            .filter(|dep| !pyproject::lock_mentions(&lock_content, dep))
            .collect())
    }
}
