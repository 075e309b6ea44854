//! Removal of an installed application.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tbi_schema::InstallationRecord;
use tracing::{debug, info, warn};

use super::{Context, refresh_desktop_database};

/// Outcome of [`uninstall`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    /// Paths deleted, files and directories alike.
    pub removed: usize,
    /// Paths that existed but could not be deleted.
    pub failed: Vec<PathBuf>,
}

impl UninstallReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete everything `record` lists: installed files, then markers, then
/// the application directory.
///
/// Missing paths are skipped. A path that cannot be deleted is reported and
/// the rest are still attempted. The registry is not touched.
pub fn uninstall(ctx: &Context, record: &InstallationRecord) -> UninstallReport {
    let reporter = &ctx.reporter;
    reporter.section("Uninstalling");
    reporter.info(&format!("Uninstalling {}", record.app_name));

    let mut report = UninstallReport::default();

    let total = record.installed_files.len().max(1);
    for (i, path) in record.installed_files.iter().enumerate() {
        let percent = u8::try_from((i + 1) * 80 / total).unwrap_or(80);
        reporter.progress(&format!("Removing {}", path.display()), percent);
        remove_path(path, &mut report);
    }

    for marker in &record.marker_files {
        remove_path(marker, &mut report);
    }

    if let Some(dir) = &record.app_install_dir {
        reporter.progress("Removing application directory...", 90);
        remove_path(dir, &mut report);
    }

    let touched_desktop_entries = record
        .installed_files
        .iter()
        .any(|p| p.extension().is_some_and(|e| e == "desktop"));
    if touched_desktop_entries {
        refresh_desktop_database(ctx, &ctx.layout.applications_dir());
    }

    for path in &report.failed {
        reporter.warning(&format!("Could not remove {}", path.display()));
    }
    reporter.progress("Uninstallation complete!", 100);
    info!(
        app_id = %record.app_id,
        removed = report.removed,
        failed = report.failed.len(),
        "uninstalled"
    );
    if report.is_clean() {
        reporter.success(&format!("Uninstalled {}", record.app_name));
    }
    report
}

fn remove_path(path: &Path, report: &mut UninstallReport) {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "already gone");
            return;
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => report.removed += 1,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to remove");
            report.failed.push(path.to_path_buf());
        }
    }
}
