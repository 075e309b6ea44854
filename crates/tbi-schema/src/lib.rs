//! Shared types and on-disk formats for tbi.
//!
//! Everything in here is persisted: the registry file is a JSON array of
//! [`InstallationRecord`] and every install directory carries a
//! [`MarkerFile`] so an installation can be rediscovered without the registry.

pub mod marker;
pub mod record;
pub mod types;

// Re-exports
pub use marker::MarkerFile;
pub use record::InstallationRecord;
pub use types::*;

/// File name of the marker dropped into every install directory.
pub const MARKER_FILE_NAME: &str = ".tarball-installer-marker.json";

/// Value written to the `installed_by` field of every marker.
pub const INSTALLED_BY: &str = "Tarball Installer";

/// Version stamped into markers and records.
pub const INSTALLER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix shared by every generated application identifier.
pub const APP_ID_PREFIX: &str = "tarball_installer_";
