//! Tolerant directory traversal.
//!
//! Extracted packages and home directories contain things we do not control:
//! broken symlinks, unreadable directories, files vanishing mid-walk. Every
//! walk here yields what it can and skips the rest.

use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Walk `root` and return every regular file (or symlink to one) in
/// name-sorted walk order.
///
/// Entries that fail to read are logged at debug level and skipped.
pub fn files_under(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
}
