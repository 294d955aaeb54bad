// SPDX-License-Identifier: Apache-2.0

//! Line-oriented scraping of `pyproject.toml` sections.
//!
//! This is deliberately NOT a TOML parser: the point is to tolerate half-valid
//! files. Unparsable lines are skipped, never raised — a malformed scripts
//! table must not break the tree view.

/// Extract script names from a pyproject.toml scripts section.
///
/// Looks for `[tool.uv.scripts]` first, then `[project.scripts]`, and
/// collects the left-hand identifier of every `name = ...` line until the
/// next section header. Lines not matching `identifier = value` are skipped.
pub fn parse_scripts(content: &str) -> Vec<String> {
    let section = section_lines(content, "[tool.uv.scripts]")
        .or_else(|| section_lines(content, "[project.scripts]"));

    let Some(lines) = section else {
        return Vec::new();
    };

    lines.filter_map(key_of_assignment).collect()
}

/// Extract dependency names from `[dependencies]`-style sections.
///
/// Only `name = "spec"` lines count (the quote is required, so section
/// headers and inline tables are naturally skipped). Unlike script names,
/// dependency names may contain hyphens.
pub fn parse_dependency_names(content: &str) -> Vec<String> {
    let Some(lines) = section_lines(content, "[dependencies]") else {
        return Vec::new();
    };

    lines
        .filter_map(|line| {
            let key: String = line
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect();
            if key.is_empty() {
                return None;
            }
            let rest = line.splitn(2, '=').nth(1)?.trim();
            (rest.starts_with('"') || rest.starts_with('\'')).then_some(key)
        })
        .collect()
}

/// Whether a lock file mentions a dependency name.
///
/// Substring match only — no structured parsing of the lock format.
pub fn lock_mentions(lock_content: &str, name: &str) -> bool {
    lock_content.contains(name)
}

/// Lines of a section: everything after the `header` line up to (excluding)
/// the next line that opens another section.
fn section_lines<'a>(
    content: &'a str,
    header: &str,
) -> Option<impl Iterator<Item = &'a str> + 'a> {
    let mut lines = content.lines();
    lines.by_ref().find(|line| line.trim() == header)?;
    Some(lines.take_while(|line| !line.trim_start().starts_with('[')))
}

/// The identifier of an `identifier = value` line, or `None`.
///
/// Mirrors the original `^(\w+)\s*=` pattern: the identifier must start at
/// column zero and consist of word characters only.
fn key_of_assignment(line: &str) -> Option<String> {
    let key: String = line
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if key.is_empty() {
        return None;
    }
    line[key.len()..]
        .trim_start()
        .starts_with('=')
        .then_some(key)
}
