//! Archive extraction module
//!
//! Handles plain tar plus gzip, bzip2, xz and zstd compressed tarballs.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use zstd::stream::Decoder as ZstdDecoder;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

/// Tarball compression, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarballFormat {
    /// Uncompressed tar archive (`.tar`).
    Tar,
    /// Gzip-compressed tar archive (`.tar.gz` / `.tgz`).
    TarGz,
    /// Bzip2-compressed tar archive (`.tar.bz2` / `.tbz2` / `.tbz`).
    TarBz2,
    /// XZ-compressed tar archive (`.tar.xz` / `.txz`).
    TarXz,
    /// Zstandard-compressed tar archive (`.tar.zst` / `.tzst`).
    TarZst,
}

/// Detect tarball format from the file name.
///
/// # Errors
///
/// Returns [`ExtractError::UnsupportedFormat`] for anything that is not a
/// supported tarball.
pub fn detect_format(path: &Path) -> Result<TarballFormat, ExtractError> {
    let path_str = path.to_string_lossy().to_lowercase();

    if path_str.ends_with(".tar.zst") || path_str.ends_with(".tzst") {
        Ok(TarballFormat::TarZst)
    } else if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
        Ok(TarballFormat::TarGz)
    } else if path_str.ends_with(".tar.xz") || path_str.ends_with(".txz") {
        Ok(TarballFormat::TarXz)
    } else if [".tar.bz2", ".tbz2", ".tbz"]
        .iter()
        .any(|ext| path_str.ends_with(ext))
    {
        Ok(TarballFormat::TarBz2)
    } else if path_str.ends_with(".tar") {
        Ok(TarballFormat::Tar)
    } else {
        Err(ExtractError::UnsupportedFormat(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ))
    }
}

/// Extract a tarball into `dest_dir`, auto-detecting compression.
///
/// Returns the number of entries unpacked.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or decoded, uses an
/// unsupported compression, or contains a path escaping `dest_dir`.
pub fn extract_tarball(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractError> {
    let format = detect_format(archive_path)?;
    let reader = BufReader::new(File::open(archive_path)?);

    match format {
        TarballFormat::Tar => extract_tar(reader, dest_dir),
        TarballFormat::TarGz => extract_tar(flate2::read::GzDecoder::new(reader), dest_dir),
        TarballFormat::TarBz2 => extract_tar(bzip2::read::BzDecoder::new(reader), dest_dir),
        TarballFormat::TarXz => extract_tar(xz2::read::XzDecoder::new(reader), dest_dir),
        TarballFormat::TarZst => extract_tar(ZstdDecoder::new(reader)?, dest_dir),
    }
}

/// Extract a tar archive from a reader
fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<usize, ExtractError> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    let mut count = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let relative_path: PathBuf = entry.path()?.components().collect();

        // unpack_in refuses entries that would land outside dest_dir
        if !entry.unpack_in(dest_dir)? {
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {}",
                relative_path.display()
            )));
        }
        count += 1;
    }

    tracing::debug!(entries = count, dest = %dest_dir.display(), "extracted tarball");
    Ok(count)
}

/// Directory that holds the package proper.
///
/// Most tarballs wrap everything in one top-level directory; when the
/// extraction holds exactly one entry and it is a directory, that directory
/// is the root. Otherwise `dir` itself is.
pub fn extraction_root(dir: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(Result::ok).map(|e| e.path()).collect(),
        Err(_) => return dir.to_path_buf(),
    };

    match entries.as_slice() {
        [only] if only.is_dir() => only.clone(),
        _ => dir.to_path_buf(),
    }
}

static ARCHIVE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(tar\.gz|tar\.bz2|tar\.xz|tar\.zst|tgz|tbz2|tbz|txz|tzst|tar)$")
        .expect("valid archive suffix regex")
});

/// Archive file name without its tarball suffix.
///
/// `tool-1.0.tar.gz` becomes `tool-1.0`.
pub fn archive_stem(file_name: &str) -> String {
    ARCHIVE_SUFFIX.replace(file_name, "").into_owned()
}

/// Human-readable application name derived from an archive file name.
///
/// `my_cool-app.tar.gz` becomes `My Cool App`.
pub fn app_name_from_archive(file_name: &str) -> String {
    archive_stem(file_name)
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
