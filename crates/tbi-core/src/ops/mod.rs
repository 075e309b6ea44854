//! Install and uninstall operations.
//!
//! - [`install::install`] extracts, analyzes and copies a tarball into the
//!   user layout and returns the record to track.
//! - [`uninstall::uninstall`] deletes what a record lists.
//!
//! Neither touches the registry; callers add or remove the record.

pub mod context;
pub mod error;
pub mod install;
pub mod uninstall;

use std::path::Path;
use std::process::{Command, Stdio};

pub use context::Context;
pub use error::InstallError;
pub use install::{InstallRequest, app_id_for, install};
pub use uninstall::{UninstallReport, uninstall};

/// Refresh the desktop entry cache for `applications_dir`.
///
/// Missing tool or a failing run is only a warning.
pub(crate) fn refresh_desktop_database(ctx: &Context, applications_dir: &Path) {
    if !ctx.refresh_desktop_database {
        return;
    }

    let status = Command::new("update-desktop-database")
        .arg(applications_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(s) if s.success() => ctx.reporter.info("Updated desktop database"),
        Ok(s) => ctx
            .reporter
            .warning(&format!("Failed to update desktop database: {s}")),
        Err(err) => ctx
            .reporter
            .warning(&format!("Failed to update desktop database: {err}")),
    }
}
