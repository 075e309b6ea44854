//! Uninstall command

use anyhow::{Context, Result, bail};

use super::{Session, confirm};

/// Remove an application's files and stop tracking it
pub async fn uninstall(session: &Session, app_id: &str, yes: bool) -> Result<()> {
    let output = &session.output;
    let mut registry = session.open_registry()?;
    let Some(record) = registry.lookup(app_id).cloned() else {
        bail!("Application '{app_id}' is not tracked");
    };

    if record.discovered {
        output.warning(
            "This record was rebuilt from a marker file; only its marker is known and other files may remain.",
        );
    }

    if session.dry_run {
        output.section(&format!("Would remove {}", record.app_name));
        for path in record
            .installed_files
            .iter()
            .chain(&record.marker_files)
            .chain(&record.app_install_dir)
        {
            output.info(&path.display().to_string());
        }
        return Ok(());
    }

    if !yes
        && !confirm(&format!(
            "This will remove {} and all of its files. Continue?",
            record.app_name
        ))?
    {
        output.error("Operation cancelled");
        return Ok(());
    }

    let ctx = session.context();
    let target = record.clone();
    let report = tokio::task::spawn_blocking(move || tbi_core::ops::uninstall(&ctx, &target)).await?;

    registry
        .remove(app_id)
        .context("Failed to save installation registry")?;

    if !report.is_clean() {
        output.warning(&format!(
            "{} file(s) could not be removed; {} is no longer tracked",
            report.failed.len(),
            record.app_name
        ));
    }
    Ok(())
}
