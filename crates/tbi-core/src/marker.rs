//! Marker file IO.
//!
//! Markers are independent of the registry: they are written next to the
//! installed files and read back by scans, so a lost registry can be rebuilt.

use std::path::{Path, PathBuf};

use tbi_schema::{MARKER_FILE_NAME, MarkerFile};

use crate::walk::files_under;

/// Write `marker` into `dir` and return the marker path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_marker(dir: &Path, marker: &MarkerFile) -> std::io::Result<PathBuf> {
    let path = dir.join(MARKER_FILE_NAME);
    std::fs::write(&path, marker.to_json())?;
    Ok(path)
}

/// Read a marker. Missing, unreadable and corrupt files all yield `None`.
pub fn read_marker(path: &Path) -> Option<MarkerFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match MarkerFile::from_json(&content) {
        Ok(marker) => Some(marker),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "ignoring corrupt marker");
            None
        }
    }
}

/// Whether `path` names a marker file.
pub fn is_marker(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == MARKER_FILE_NAME)
}

/// Every marker file under `root`, in walk order. Contents are not checked.
pub fn find_markers(root: &Path) -> Vec<PathBuf> {
    files_under(root)
        .filter(|entry| is_marker(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbi_schema::{INSTALLED_BY, INSTALLER_VERSION, InstallType};
    use tempfile::tempdir;

    #[test]
    fn test_marker_round_trip_keeps_identity() {
        let tmp = tempdir().unwrap();
        let marker = MarkerFile {
            installed_by: INSTALLED_BY.to_string(),
            installer_version: INSTALLER_VERSION.to_string(),
            app_id: "tarball_installer_0123456789ab".into(),
            app_name: "Foo Bar".to_string(),
            app_version: "2.1".to_string(),
            install_time: "2026-10-19T10:00:00".to_string(),
            install_type: InstallType::System,
            tarball_source: "foo-bar.tar.gz".to_string(),
        };

        let path = write_marker(tmp.path(), &marker).unwrap();
        assert!(is_marker(&path));

        let back = read_marker(&path).unwrap();
        assert_eq!(back.app_id, marker.app_id);
        assert_eq!(back.app_name, marker.app_name);
        assert_eq!(back.install_type, InstallType::System);
    }

    #[test]
    fn test_corrupt_marker_is_absent() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(MARKER_FILE_NAME);
        std::fs::write(&path, "{ truncated").unwrap();
        assert!(read_marker(&path).is_none());
        assert!(read_marker(&tmp.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_find_markers_ignores_other_files() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("Applications/foo");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("marker.json"), "{}").unwrap();
        std::fs::write(nested.join(MARKER_FILE_NAME), "{}").unwrap();

        assert_eq!(find_markers(tmp.path()), vec![nested.join(MARKER_FILE_NAME)]);
        assert!(find_markers(&tmp.path().join("absent")).is_empty());
    }
}
