//! The marker file dropped into every install directory.

use serde::{Deserialize, Serialize};

use crate::types::{AppId, InstallType};
use crate::{INSTALLED_BY, INSTALLER_VERSION};

/// Sentinel left inside an install directory.
///
/// A marker survives deletion of the registry file, which is what lets a
/// later scan rediscover the installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerFile {
    /// Always [`INSTALLED_BY`] for markers this tool writes.
    #[serde(default = "default_installed_by")]
    pub installed_by: String,

    /// Version of the installer that wrote the marker.
    #[serde(default = "default_installer_version")]
    pub installer_version: String,

    /// Identifier of the installation this marker belongs to.
    pub app_id: AppId,

    /// Display name of the application.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Version taken from the desktop entry, `1.0` when unknown.
    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// ISO-8601 timestamp of the install.
    #[serde(default)]
    pub install_time: String,

    /// User or system install.
    #[serde(default)]
    pub install_type: InstallType,

    /// Basename of the source archive.
    #[serde(default)]
    pub tarball_source: String,
}

fn default_installed_by() -> String {
    INSTALLED_BY.to_string()
}

fn default_installer_version() -> String {
    INSTALLER_VERSION.to_string()
}

fn default_app_name() -> String {
    "Unknown".to_string()
}

fn default_app_version() -> String {
    "1.0".to_string()
}

impl MarkerFile {
    /// Serialize to the pretty-printed JSON written on disk.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parse a marker document.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not JSON or lacks an `app_id`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let marker = MarkerFile::from_json(r#"{"app_id": "tarball_installer_abc"}"#).unwrap();
        assert_eq!(marker.app_name, "Unknown");
        assert_eq!(marker.app_version, "1.0");
        assert_eq!(marker.install_type, InstallType::User);
        assert_eq!(marker.installed_by, INSTALLED_BY);
    }

    #[test]
    fn test_marker_without_app_id_is_rejected() {
        assert!(MarkerFile::from_json(r#"{"app_name": "Foo"}"#).is_err());
        assert!(MarkerFile::from_json("not json").is_err());
    }
}
