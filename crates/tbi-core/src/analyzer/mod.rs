//! Package analysis.
//!
//! Turns an extracted package tree into the lists the installer needs:
//! desktop entries, candidate executables, icons, and one chosen main binary.
//!
//! All walks are best-effort. A file that cannot be stat'ed or read is simply
//! not a candidate; analysis never fails because one file misbehaved.

pub mod desktop;
pub mod scoring;

use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::walk::files_under;
pub use desktop::{DesktopEntry, parse_desktop_file};
pub use scoring::{BinaryTraits, CandidateBinary, rank};

/// ELF magic: `\x7fELF`
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Bytes inspected when deciding whether an extension-less file is binary.
const SAMPLE_LEN: u64 = 1024;

/// Extension-less files at or below this size are never treated as binaries.
const MIN_UNMARKED_BINARY_SIZE: u64 = 100;

const ICON_EXTENSIONS: [&str; 4] = ["png", "svg", "xpm", "ico"];

/// Everything found in one extracted package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageContents {
    pub root: PathBuf,
    pub desktop_files: Vec<PathBuf>,
    pub binaries: Vec<PathBuf>,
    pub icons: Vec<PathBuf>,
    pub main_binary: Option<PathBuf>,
}

impl PackageContents {
    /// Parsed metadata of the first desktop entry, if any can be read.
    pub fn primary_desktop_entry(&self) -> Option<DesktopEntry> {
        self.desktop_files.first().and_then(|p| parse_desktop_file(p))
    }
}

/// Analyzer over one extracted package tree.
#[derive(Debug, Clone)]
pub struct PackageAnalyzer {
    root: PathBuf,
}

impl PackageAnalyzer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every file named `*.desktop`. Not parsed here.
    pub fn find_desktop_files(&self) -> Vec<PathBuf> {
        files_under(&self.root)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".desktop"))
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Every executable that looks like a program.
    ///
    /// A file qualifies when an execute bit is set and either it starts with
    /// a shebang or ELF magic, or it has no extension, is larger than 100
    /// bytes, and its first kilobyte contains a non-ASCII byte.
    pub fn find_binaries(&self) -> Vec<PathBuf> {
        files_under(&self.root)
            .filter(|entry| match classify(entry.path()) {
                Ok(is_binary) => is_binary,
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %err, "skipping unreadable file");
                    false
                }
            })
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Image files that are plausibly application icons.
    pub fn find_icons(&self) -> Vec<PathBuf> {
        files_under(&self.root)
            .map(walkdir::DirEntry::into_path)
            .filter(|path| is_icon(&self.root, path))
            .collect()
    }

    /// Run every walk and pick a main binary.
    pub fn analyze(&self) -> PackageContents {
        let desktop_files = self.find_desktop_files();
        let binaries = self.find_binaries();
        let icons = self.find_icons();
        let main_binary = identify_main_binary(&binaries, &desktop_files);

        info!(
            root = %self.root.display(),
            desktop_files = desktop_files.len(),
            binaries = binaries.len(),
            icons = icons.len(),
            "analyzed package"
        );

        PackageContents {
            root: self.root.clone(),
            desktop_files,
            binaries,
            icons,
            main_binary,
        }
    }

    /// Like [`analyze`](Self::analyze), but a manually selected binary wins
    /// over the heuristic when it exists.
    ///
    /// `selected` may be absolute or relative to the package root.
    pub fn analyze_with_selection(&self, selected: Option<&Path>) -> PackageContents {
        let mut contents = self.analyze();
        if let Some(selected) = selected {
            let path = self.root.join(selected);
            if path.is_file() {
                contents.main_binary = Some(path);
            } else {
                debug!(path = %path.display(), "selected binary not found, keeping heuristic choice");
            }
        }
        contents
    }
}

/// Choose the main binary.
///
/// The first desktop entry's `Exec=` program wins outright when a candidate
/// has that basename. Otherwise the best-scoring candidate is returned.
/// No candidates means no main binary.
pub fn identify_main_binary(binaries: &[PathBuf], desktop_files: &[PathBuf]) -> Option<PathBuf> {
    if binaries.is_empty() {
        return None;
    }

    let exec_match = desktop_files
        .first()
        .and_then(|d| parse_desktop_file(d))
        .and_then(|entry| {
            let program = entry.exec_program()?.to_string();
            binaries
                .iter()
                .find(|b| b.file_name().is_some_and(|n| n == program.as_str()))
                .cloned()
        });
    if let Some(binary) = exec_match {
        debug!(binary = %binary.display(), "main binary named by desktop entry");
        return Some(binary);
    }

    let ranked = rank(binaries);
    for candidate in ranked.iter().take(3) {
        debug!(binary = %candidate.path.display(), score = candidate.score, "binary score");
    }
    ranked.into_iter().next().map(|c| c.path)
}

fn classify(path: &Path) -> io::Result<bool> {
    let meta = std::fs::metadata(path)?;
    if !is_executable(&meta) {
        return Ok(false);
    }

    let mut sample = Vec::with_capacity(SAMPLE_LEN as usize);
    File::open(path)?.take(SAMPLE_LEN).read_to_end(&mut sample)?;

    if sample.starts_with(b"#!") || sample.starts_with(&ELF_MAGIC) {
        return Ok(true);
    }

    let has_extension = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().contains('.'));
    Ok(!has_extension
        && meta.len() > MIN_UNMARKED_BINARY_SIZE
        && sample.iter().any(|&b| b >= 0x80))
}

#[cfg(unix)]
fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &Metadata) -> bool {
    false
}

fn is_icon(root: &Path, path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return false;
    };
    let has_icon_ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| ICON_EXTENSIONS.contains(&e.as_str()));
    if !has_icon_ext {
        return false;
    }

    let in_icons_dir = path
        .parent()
        .and_then(|p| p.strip_prefix(root).ok())
        .is_some_and(|rel| {
            rel.components()
                .any(|c| c.as_os_str().to_string_lossy().to_lowercase().contains("icons"))
        });

    name.contains("icon") || in_icons_dir
}
