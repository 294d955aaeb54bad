// SPDX-License-Identifier: Apache-2.0

//! Configuration surface for uvkit.
//!
//! Resolution order: `<workspace>/uvkit.toml`, then
//! `~/.config/uvkit/config.toml`, then built-in defaults. A malformed file is
//! logged and ignored — configuration never fails a command.

use std::path::Path;

use crate::activity_log;

/// How the tree adapter groups its root nodes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One root node per discovered environment.
    #[default]
    Folder,
    /// Root nodes per environment kind (venv / uv-project).
    Venv,
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::Venv => write!(f, "venv"),
        }
    }
}

/// Named options, all with defaults.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default Python version passed to `uv venv` (empty = uv's default).
    pub python_version: String,
    /// Virtual-environment directory name looked for in each folder.
    pub venv_path: String,
    /// Package manager tag (informational; only `uv` is implemented).
    pub manager: String,
    /// Tree grouping mode.
    pub group_by: GroupBy,
    /// Whether the tree shows script children parsed from pyproject.toml.
    pub show_scripts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_version: String::new(),
            venv_path: ".venv".to_string(),
            manager: "uv".to_string(),
            group_by: GroupBy::Folder,
            show_scripts: true,
        }
    }
}

impl Config {
    /// Load configuration for a workspace, falling back to defaults.
    pub fn load(workspace_root: &Path) -> Self {
        let candidates = [
            workspace_root.join("uvkit.toml"),
            crate::utils::state_dir().join("config.toml"),
        ];

        for path in &candidates {
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            match toml::from_str::<Config>(&content) {
                Ok(config) => return config,
                Err(e) => {
                    activity_log::log_activity(
                        "cli",
                        "config:error",
                        &format!("{} - {}", path.display(), e),
                    );
                }
            }
        }

        Self::default()
    }
}
