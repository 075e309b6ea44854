//! Best-effort reader for freedesktop `.desktop` entries.
//!
//! Only the `[Desktop Entry]` section is looked at, and only the keys the
//! installer needs. Anything unreadable is treated as absent.

use std::path::Path;

const DESKTOP_ENTRY_HEADER: &str = "[Desktop Entry]";

/// Metadata read from a `[Desktop Entry]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: Option<String>,
    pub comment: String,
    pub exec: String,
    pub icon: String,
    pub categories: Vec<String>,
    pub version: String,
}

impl Default for DesktopEntry {
    fn default() -> Self {
        Self {
            name: None,
            comment: String::new(),
            exec: String::new(),
            icon: String::new(),
            categories: Vec::new(),
            version: "1.0".to_string(),
        }
    }
}

impl DesktopEntry {
    /// Parse entry text.
    ///
    /// Lines are trimmed, a bracketed line switches sections, and keys are
    /// split at the first `=` without further trimming.
    pub fn parse(content: &str) -> Self {
        let mut entry = Self::default();
        let mut in_desktop_entry = false;

        for line in content.lines() {
            let line = line.trim();
            if line == DESKTOP_ENTRY_HEADER {
                in_desktop_entry = true;
            } else if line.starts_with('[') && line.ends_with(']') {
                in_desktop_entry = false;
            } else if in_desktop_entry {
                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                match key {
                    "Name" => entry.name = Some(value.to_string()),
                    "Comment" => entry.comment = value.to_string(),
                    "Exec" => entry.exec = value.to_string(),
                    "Icon" => entry.icon = value.to_string(),
                    "Categories" => {
                        entry.categories = value.split(';').map(str::to_string).collect();
                    }
                    "Version" => entry.version = value.to_string(),
                    _ => {}
                }
            }
        }

        entry
    }

    /// Basename of the program named by `Exec=`.
    ///
    /// Takes the first whitespace-separated token only: no shell unquoting,
    /// no variable expansion, field codes like `%f` are left alone.
    pub fn exec_program(&self) -> Option<&str> {
        let first = self.exec.split_whitespace().next()?;
        Some(first.rsplit('/').next().unwrap_or(first))
    }
}

/// Read and parse a desktop file. Unreadable or non-UTF-8 files yield `None`.
pub fn parse_desktop_file(path: &Path) -> Option<DesktopEntry> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(DesktopEntry::parse(&content)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "unreadable desktop file");
            None
        }
    }
}

/// Point every `Exec=` line at a launcher in `launcher_dir`, keeping arguments.
///
/// `Exec=/opt/foo/bin/foo %U` becomes `Exec=<launcher_dir>/foo %U`.
pub fn rewrite_exec_lines(content: &str, launcher_dir: &Path) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let Some(exec) = line.strip_prefix("Exec=") else {
            out.push_str(line);
            continue;
        };

        let mut parts = exec.split_whitespace();
        let Some(program) = parts.next() else {
            out.push_str(line);
            continue;
        };
        let name = program.rsplit('/').next().unwrap_or(program);
        let args: Vec<&str> = parts.collect();

        out.push_str("Exec=");
        out.push_str(&launcher_dir.join(name).to_string_lossy());
        if !args.is_empty() {
            out.push(' ');
            out.push_str(&args.join(" "));
        }
        out.push('\n');
    }
    out
}
