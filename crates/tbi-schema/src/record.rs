//! Registry records and how they are rebuilt from markers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::marker::MarkerFile;
use crate::types::{AppId, InstallType};

/// One tracked application in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Unique key within the registry.
    pub app_id: AppId,

    /// Display name.
    #[serde(default)]
    pub app_name: String,

    /// Application version (`1.0` when the package does not say).
    #[serde(default)]
    pub app_version: String,

    /// Basename of the archive the application came from.
    #[serde(default)]
    pub source_filename: String,

    /// ISO-8601 timestamp of the install.
    #[serde(default)]
    pub install_time: String,

    /// User or system install.
    #[serde(default)]
    pub install_type: InstallType,

    /// Absolute paths written during install, in write order.
    #[serde(default)]
    pub installed_files: Vec<PathBuf>,

    /// Marker files belonging to this installation.
    #[serde(default)]
    pub marker_files: Vec<PathBuf>,

    /// `true` when the record was synthesized from a marker found on disk.
    #[serde(default)]
    pub discovered: bool,

    /// Full path of the source archive, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,

    /// Executable chosen to represent the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_binary: Option<PathBuf>,

    /// Copied package tree under `~/Applications`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_install_dir: Option<PathBuf>,

    /// Version of the installer that produced the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_version: Option<String>,
}

impl InstallationRecord {
    /// Create an empty record for `app_id`.
    pub fn new(app_id: impl Into<AppId>) -> Self {
        Self {
            app_id: app_id.into(),
            app_name: String::new(),
            app_version: String::new(),
            source_filename: String::new(),
            install_time: String::new(),
            install_type: InstallType::User,
            installed_files: Vec::new(),
            marker_files: Vec::new(),
            discovered: false,
            source_file: None,
            main_binary: None,
            app_install_dir: None,
            installer_version: None,
        }
    }

    /// Build a `discovered` record from a marker found at `marker_path`.
    ///
    /// The result lists no installed files: only the marker itself is known.
    pub fn from_marker(marker: &MarkerFile, marker_path: PathBuf) -> Self {
        Self {
            app_name: marker.app_name.clone(),
            app_version: marker.app_version.clone(),
            source_filename: marker.tarball_source.clone(),
            install_time: marker.install_time.clone(),
            install_type: marker.install_type,
            marker_files: vec![marker_path],
            discovered: true,
            installer_version: Some(marker.installer_version.clone()),
            ..Self::new(marker.app_id.clone())
        }
    }

    /// Overwrite this record with `newer`.
    ///
    /// Every field takes the newer value; optional fields the newer record
    /// leaves unset keep their current value.
    pub fn merge(&mut self, newer: Self) {
        let Self {
            app_id,
            app_name,
            app_version,
            source_filename,
            install_time,
            install_type,
            installed_files,
            marker_files,
            discovered,
            source_file,
            main_binary,
            app_install_dir,
            installer_version,
        } = newer;

        self.app_id = app_id;
        self.app_name = app_name;
        self.app_version = app_version;
        self.source_filename = source_filename;
        self.install_time = install_time;
        self.install_type = install_type;
        self.installed_files = installed_files;
        self.marker_files = marker_files;
        self.discovered = discovered;
        self.source_file = source_file.or(self.source_file.take());
        self.main_binary = main_binary.or(self.main_binary.take());
        self.app_install_dir = app_install_dir.or(self.app_install_dir.take());
        self.installer_version = installer_version.or(self.installer_version.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_and_keeps_unset_options() {
        let mut old = InstallationRecord::new("x");
        old.app_name = "A".to_string();
        old.main_binary = Some(PathBuf::from("/opt/a/bin/a"));

        let mut newer = InstallationRecord::new("x");
        newer.app_name = "B".to_string();
        newer.installed_files = vec![PathBuf::from("/home/u/.local/bin/b")];

        old.merge(newer);
        assert_eq!(old.app_name, "B");
        assert_eq!(old.installed_files.len(), 1);
        assert_eq!(old.main_binary, Some(PathBuf::from("/opt/a/bin/a")));
    }

    #[test]
    fn test_record_decodes_with_only_app_id() {
        let record: InstallationRecord = serde_json::from_str(r#"{"app_id": "x"}"#).unwrap();
        assert_eq!(record.app_id, "x");
        assert!(!record.discovered);
        assert!(record.installed_files.is_empty());
    }
}
