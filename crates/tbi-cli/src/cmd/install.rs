//! Install command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tbi_core::io::extract::detect_format;
use tbi_core::ops::{InstallRequest, app_id_for};
use tbi_schema::InstallType;

use super::Session;
use super::analyze::extract_and_analyze;

/// Install a tarball and start tracking it
pub async fn install(
    session: &Session,
    archive: &Path,
    binary: Option<PathBuf>,
    system: bool,
) -> Result<()> {
    let output = &session.output;
    let archive = std::path::absolute(archive)?;
    if !archive.is_file() {
        bail!("Archive not found: {}", archive.display());
    }
    detect_format(&archive)?;

    let mut registry = session.open_registry()?;
    let app_id = app_id_for(&archive);
    if let Some(existing) = registry.lookup(&app_id) {
        output.info(&format!(
            "{} is already installed, reinstalling",
            existing.app_name
        ));
    }

    if session.dry_run {
        let (_scratch, contents) = extract_and_analyze(&archive).await?;
        output.section("Dry run");
        output.field("app id", &app_id);
        output.field("install to", session.layout.apps_root().display());
        output.field("launchers", contents.binaries.len());
        output.field("desktop", contents.desktop_files.len());
        output.field("icons", contents.icons.len());
        return Ok(());
    }

    let mut request = InstallRequest::new(&archive);
    request.selected_binary = binary;
    if system {
        request.install_type = InstallType::System;
    }

    let ctx = session.context();
    let record = tokio::task::spawn_blocking(move || tbi_core::ops::install(&ctx, &request))
        .await?
        .with_context(|| format!("Failed to install {}", archive.display()))?;

    let app_id = record.app_id.clone();
    registry
        .add(record)
        .context("Failed to save installation registry")?;

    output.field("app id", &app_id);
    Ok(())
}
