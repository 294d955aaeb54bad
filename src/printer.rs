// SPDX-License-Identifier: Apache-2.0

//! Output control for uvkit — "Verbosity as a Type" pattern.
//!
//! The `Printer` enum prevents stray `println!` from corrupting `--json`
//! output. All decorative CLI output goes through the printer, which
//! silently discards it when a command is emitting machine-readable JSON.

use owo_colors::OwoColorize;

/// Controls all uvkit terminal output.
///
/// In `Default` mode, output goes to stdout/stderr with colors.
/// In `Silent` mode (`--json`), decoration is suppressed — the command
/// prints structured JSON instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printer {
    /// Normal CLI output with colors.
    Default,
    /// Suppress decorative output (JSON mode).
    Silent,
}

#[allow(dead_code)]
impl Printer {
    /// Print a plain message to stdout.
    pub fn println(&self, msg: &str) {
        if *self == Self::Default {
            println!("{msg}");
        }
    }

    /// Print a success message (✓ prefix).
    pub fn success(&self, msg: &str) {
        if *self == Self::Default {
            println!("  {} {}", "✓".green(), msg);
        }
    }

    /// Print an info message (△ prefix).
    pub fn info(&self, msg: &str) {
        if *self == Self::Default {
            println!("  {} {}", "△".truecolor(255, 182, 193), msg);
        }
    }

    /// Print a warning message (⚠ prefix).
    pub fn warning(&self, msg: &str) {
        if *self == Self::Default {
            eprintln!("  {} {}", "⚠".truecolor(255, 140, 0), msg);
        }
    }

    /// Print an error message (✗ prefix).
    pub fn error(&self, msg: &str) {
        if *self == Self::Default {
            eprintln!("  {} {}", "✗".red(), msg);
        }
    }

    /// Print a comfy_table::Table to stdout.
    pub fn table(&self, table: &comfy_table::Table) {
        if *self == Self::Default {
            println!("{table}");
        }
    }
}
