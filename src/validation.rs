// SPDX-License-Identifier: Apache-2.0

//! Input validation for command-line arguments.

use std::path::Path;

/// Validates a Python version string.
///
/// Accepts formats like "3.12", "3.11.4", "3"
pub fn validate_python_version(version: &str) -> Result<(), String> {
    let parts: Vec<&str> = version.split('.').collect();

    if parts.is_empty() || parts.len() > 3 {
        return Err("Invalid Python version format (use X.Y or X.Y.Z)".to_string());
    }

    for part in parts {
        if part.parse::<u32>().is_err() {
            return Err(format!("Invalid Python version component: {}", part));
        }
    }

    Ok(())
}

/// Validates a file path for safety.
///
/// Ensures the path doesn't carry null bytes and, when required, exists.
pub fn validate_path(path: &Path, must_exist: bool) -> Result<(), String> {
    if path.to_string_lossy().contains('\0') {
        return Err("Path contains null bytes".to_string());
    }

    if must_exist && !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }

    Ok(())
}
