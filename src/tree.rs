// SPDX-License-Identifier: Apache-2.0

//! Tree presentation adapter.
//!
//! The tree is a pure function of the scanner's records plus configuration,
//! rebuilt from scratch on every refresh. No incremental patching — that
//! choice sidesteps partial-update consistency bugs.

use crate::config::{Config, GroupBy};
use crate::pyproject;
use crate::types::{EnvKind, PythonEnvironment};

/// One node of the rendered hierarchy.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TreeNode {
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }
}

/// Build the tree for a set of scan records.
///
/// `folder` grouping: one root per record, script children beneath it.
/// `venv` grouping: one root per environment kind, environments beneath,
/// scripts beneath those.
pub fn build_tree(records: &[PythonEnvironment], config: &Config) -> Vec<TreeNode> {
    match config.group_by {
        GroupBy::Folder => records.iter().map(|env| env_node(env, config)).collect(),
        GroupBy::Venv => [EnvKind::Venv, EnvKind::UvProject]
            .into_iter()
            .filter_map(|kind| {
                let children: Vec<TreeNode> = records
                    .iter()
                    .filter(|e| e.kind == kind)
                    .map(|env| env_node(env, config))
                    .collect();
                (!children.is_empty()).then(|| TreeNode {
                    label: kind.to_string(),
                    children,
                })
            })
            .collect(),
    }
}

fn env_node(env: &PythonEnvironment, config: &Config) -> TreeNode {
    let children = if config.show_scripts {
        script_nodes(env)
    } else {
        Vec::new()
    };
    TreeNode {
        label: env.label.clone(),
        children,
    }
}

/// Script children parsed from the record's `pyproject.toml`.
///
/// An unreadable or script-less marker file simply yields no children.
fn script_nodes(env: &PythonEnvironment) -> Vec<TreeNode> {
    let marker = env.project_root.join("pyproject.toml");
    let Ok(content) = std::fs::read_to_string(&marker) else {
        return Vec::new();
    };
    pyproject::parse_scripts(&content)
        .into_iter()
        .map(TreeNode::leaf)
        .collect()
}

/// Render a forest as indented text.
pub fn render(nodes: &[TreeNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let bullet = if depth == 0 { "●" } else { "└" };
    out.push_str(&format!("{}{} {}\n", indent, bullet, node.label));
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn workspace_with_scripts() -> (PathBuf, Vec<PythonEnvironment>) {
        let ws = std::env::temp_dir().join("uvkit_tree_test");
        fs::remove_dir_all(&ws).ok();
        fs::create_dir_all(ws.join("app")).unwrap();
        fs::write(
            ws.join("app/pyproject.toml"),
            "[project.scripts]\nserve = \"app:run\"\n",
        )
        .unwrap();
        fs::write(ws.join("app/uv.lock"), "").unwrap();

        let records = vec![PythonEnvironment::uv_project("app", ws.join("app"))];
        (ws, records)
    }

    #[test]
    fn test_folder_grouping_with_scripts() {
        let (ws, records) = workspace_with_scripts();
        let tree = build_tree(&records, &Config::default());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].label, "app (uv)");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].label, "serve");
        fs::remove_dir_all(&ws).ok();
    }

    #[test]
    fn test_scripts_hidden_when_disabled() {
        let (ws, records) = workspace_with_scripts();
        let config = Config {
            show_scripts: false,
            ..Config::default()
        };
        let tree = build_tree(&records, &config);
        assert!(tree[0].children.is_empty());
        fs::remove_dir_all(&ws).ok();
    }

    #[test]
    fn test_kind_grouping() {
        let venv = PythonEnvironment::venv(
            "web",
            PathBuf::from("/ws/web/.venv"),
            PathBuf::from("/ws/web"),
        );
        let proj = PythonEnvironment::uv_project("svc", PathBuf::from("/ws/svc"));
        let config = Config {
            group_by: crate::config::GroupBy::Venv,
            show_scripts: false,
            ..Config::default()
        };

        let tree = build_tree(&[venv, proj], &config);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].label, "venv");
        assert_eq!(tree[0].children[0].label, "web (.venv)");
        assert_eq!(tree[1].label, "uv-project");
        assert_eq!(tree[1].children[0].label, "svc (uv)");
    }

    #[test]
    fn test_empty_records_empty_tree() {
        assert!(build_tree(&[], &Config::default()).is_empty());
    }

    #[test]
    fn test_render_indents_children() {
        let (ws, records) = workspace_with_scripts();
        let text = render(&build_tree(&records, &Config::default()));
        assert!(text.contains("● app (uv)"));
        assert!(text.contains("  └ serve"));
        fs::remove_dir_all(&ws).ok();
    }
}
