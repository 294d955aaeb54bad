// SPDX-License-Identifier: Apache-2.0

//! CLI integration tests — run the uvkit binary as a subprocess against
//! real workspace layouts.
//!
//! Each test gets an isolated HOME via tempdir, so the interpreter
//! selection file and activity log never touch the developer's setup.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Helper: run uvkit with an isolated HOME.
fn uvkit_cmd(tmp: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_uvkit"))
        .args(args)
        .env("HOME", tmp)
        .env_remove("VIRTUAL_ENV")
        .output()
        .expect("failed to execute uvkit binary")
}

/// Combined stdout + stderr.
fn all_output(output: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

// ── Version & Help ──────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let tmp = tempfile::tempdir().unwrap();
    let out = uvkit_cmd(tmp.path(), &["--version"]);
    assert!(
        all_output(&out).contains("uvkit"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_help() {
    let tmp = tempfile::tempdir().unwrap();
    let out = uvkit_cmd(tmp.path(), &["--help"]);
    assert!(
        all_output(&out).contains("uv-managed"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_landing_screen() {
    let tmp = tempfile::tempdir().unwrap();
    let out = uvkit_cmd(tmp.path(), &[]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("Commands"),
        "unexpected: {}",
        all_output(&out)
    );
}

// ── List ────────────────────────────────────────────────────────

#[test]
fn test_cli_list_empty_workspace() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "list"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("No environments discovered"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_list_json() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(ws.join("app/.venv")).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "list", "--json"],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let records: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    let records = records.as_array().expect("expected JSON array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["label"], "app (.venv)");
    assert_eq!(records[0]["type"], "venv");
    assert_eq!(records[0]["manager"], "uvkit:uv");
}

#[test]
fn test_cli_missing_workspace_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let out = uvkit_cmd(tmp.path(), &["--workspace", "/nonexistent/ws", "list"]);
    assert!(!out.status.success());
    assert!(
        all_output(&out).contains("No workspace folder"),
        "unexpected: {}",
        all_output(&out)
    );
}

// ── Tree ────────────────────────────────────────────────────────

#[test]
fn test_cli_tree_with_scripts() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    write(
        &ws.join("app/pyproject.toml"),
        "[project]\nname = \"app\"\n\n[project.scripts]\nserve = \"app:run\"\n",
    );
    write(&ws.join("app/uv.lock"), "version = 1\n");

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "tree"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    let text = all_output(&out);
    assert!(text.contains("app (uv)"), "unexpected: {}", text);
    assert!(text.contains("serve"), "unexpected: {}", text);

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "tree", "--no-scripts"],
    );
    let text = all_output(&out);
    assert!(text.contains("app (uv)"), "unexpected: {}", text);
    assert!(!text.contains("serve"), "unexpected: {}", text);
}

// ── Status ──────────────────────────────────────────────────────

#[test]
fn test_cli_status_no_environment() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "status"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("no uv environment"),
        "unexpected: {}",
        all_output(&out)
    );

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "status", "--json"],
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(json["state"], "no-environment");
}

// ── Health ──────────────────────────────────────────────────────

#[test]
fn test_cli_health_missing_files_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "health"]);
    assert!(!out.status.success());
    assert!(
        all_output(&out).contains("not found"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_health_reports_drift() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    write(
        &ws.join("pyproject.toml"),
        "[dependencies]\nrequests = \"2.31\"\nflask = \"3.0\"\n",
    );
    write(&ws.join("uv.lock"), "name = \"requests\"\n");

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "health"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("Missing dependencies in uv.lock: flask"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_health_all_present() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    write(&ws.join("pyproject.toml"), "[dependencies]\nrequests = \"2.31\"\n");
    write(&ws.join("uv.lock"), "name = \"requests\"\n");

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "health"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("All dependencies are present"),
        "unexpected: {}",
        all_output(&out)
    );
}

// ── Rm / Activate ───────────────────────────────────────────────

#[test]
fn test_cli_rm_unknown_env_is_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "rm", "ghost", "--yes"],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("not found"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_rm_removes_venv() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(ws.join("app/.venv")).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "rm", "app", "--yes"],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(!ws.join("app/.venv").exists());
    assert!(ws.join("app").exists(), "only the venv dir is removed");
}

#[test]
fn test_cli_rm_env_in_secondary_workspace_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(b.join("app/.venv")).unwrap();

    // The environment lives in the second folder; it must still be
    // addressable by selector, exactly as `list` shows it.
    let out = uvkit_cmd(
        tmp.path(),
        &[
            "--workspace",
            a.to_str().unwrap(),
            "--workspace",
            b.to_str().unwrap(),
            "rm",
            "app",
            "--yes",
        ],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(!b.join("app/.venv").exists());
}

#[test]
fn test_cli_packages_env_in_secondary_workspace_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(b.join("app/.venv")).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &[
            "--workspace",
            a.to_str().unwrap(),
            "--workspace",
            b.to_str().unwrap(),
            "packages",
            "app",
            "--json",
        ],
    );
    // Resolution succeeds; the listing itself degrades to an empty array
    // because the dummy venv has no working uv/pip.
    assert!(out.status.success(), "failed: {}", all_output(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let packages: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(packages, serde_json::json!([]));
}

#[test]
fn test_cli_activate_missing_interpreter_is_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(ws.join("app/.venv")).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "activate", "app"],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("No interpreter"),
        "unexpected: {}",
        all_output(&out)
    );
    // No selection file was recorded.
    assert!(!tmp.path().join(".config/uvkit/interpreter").exists());
}

#[test]
fn test_cli_activate_records_interpreter() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    write(&ws.join("app/.venv/bin/python"), "");

    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "activate", "app"],
    );
    assert!(out.status.success(), "failed: {}", all_output(&out));

    let recorded = fs::read_to_string(tmp.path().join(".config/uvkit/interpreter")).unwrap();
    assert!(recorded.contains(".venv/bin/python"), "unexpected: {}", recorded);

    // A subsequent list marks the environment active.
    let out = uvkit_cmd(
        tmp.path(),
        &["--workspace", ws.to_str().unwrap(), "list", "--json"],
    );
    let records: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&out.stdout)).expect("invalid JSON");
    assert_eq!(records[0]["isActive"], true);
}

// ── Watch ───────────────────────────────────────────────────────

#[test]
fn test_cli_watch_survives_vanishing_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a");
    let b = tmp.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_uvkit"))
        .args([
            "--workspace",
            a.to_str().unwrap(),
            "--workspace",
            b.to_str().unwrap(),
            "watch",
        ])
        .env("HOME", tmp.path())
        .env_remove("VIRTUAL_ENV")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .expect("failed to spawn uvkit watch");

    std::thread::sleep(Duration::from_millis(500));

    // One folder vanishes, then a marker change lands: the refresh scan
    // fails, but the watch must keep running.
    fs::remove_dir_all(&b).unwrap();
    fs::write(a.join("pyproject.toml"), "[project]\n").unwrap();
    std::thread::sleep(Duration::from_millis(1500));

    assert!(
        child.try_wait().unwrap().is_none(),
        "watch exited on a transient scan failure"
    );
    child.kill().ok();
    child.wait().ok();
}

// ── Install (validation only) ───────────────────────────────────

#[test]
fn test_cli_install_rejects_bad_package_name() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(ws.join("app/.venv")).unwrap();

    let out = uvkit_cmd(
        tmp.path(),
        &[
            "--workspace",
            ws.to_str().unwrap(),
            "install",
            "app",
            "bad;name",
        ],
    );
    assert!(!out.status.success());
    assert!(
        all_output(&out).contains("Invalid package name"),
        "unexpected: {}",
        all_output(&out)
    );
}

// ── Log & Config ────────────────────────────────────────────────

#[test]
fn test_cli_log_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let out = uvkit_cmd(tmp.path(), &["log"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    assert!(
        all_output(&out).contains("No log entries"),
        "unexpected: {}",
        all_output(&out)
    );
}

#[test]
fn test_cli_config_shows_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let out = uvkit_cmd(tmp.path(), &["--workspace", ws.to_str().unwrap(), "config"]);
    assert!(out.status.success(), "failed: {}", all_output(&out));
    let text = all_output(&out);
    assert!(text.contains("venv_path"), "unexpected: {}", text);
    assert!(text.contains(".venv"), "unexpected: {}", text);
}
