//! Analyze command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tbi_core::analyzer::{PackageAnalyzer, PackageContents, rank};
use tbi_core::io::extract::{app_name_from_archive, extract_tarball, extraction_root};
use tbi_core::ops::app_id_for;
use tempfile::TempDir;

use super::Session;

/// Extract `archive` to a scratch directory and analyze it.
///
/// The returned `TempDir` owns the extraction; dropping it deletes the files
/// `PackageContents` points at.
pub async fn extract_and_analyze(archive: &Path) -> Result<(TempDir, PackageContents)> {
    let archive = archive.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<(TempDir, PackageContents)> {
        let tmp = tempfile::Builder::new()
            .prefix("tarball_installer_")
            .tempdir()
            .context("Failed to create extraction directory")?;
        extract_tarball(&archive, tmp.path())
            .with_context(|| format!("Failed to extract {}", archive.display()))?;
        let contents = PackageAnalyzer::new(extraction_root(tmp.path())).analyze();
        Ok((tmp, contents))
    })
    .await?
}

/// Show what a tarball would install
pub async fn analyze(session: &Session, archive: &Path) -> Result<()> {
    let output = &session.output;
    let archive = std::path::absolute(archive)?;
    let (_scratch, contents) = extract_and_analyze(&archive).await?;

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (name, version) = match contents.primary_desktop_entry() {
        Some(entry) if entry.name.is_some() => (entry.name.unwrap_or_default(), entry.version),
        _ => (app_name_from_archive(&file_name), "1.0".to_string()),
    };

    println!();
    println!("  {} {}", name.as_str().white().bold(), version.as_str().dark_grey());
    println!();
    output.field("app id", app_id_for(&archive));
    output.field(
        "main binary",
        contents
            .main_binary
            .as_deref()
            .map_or_else(|| "none found".to_string(), |p| relative(&contents.root, p)),
    );

    section(output, "desktop entries", &contents.root, &contents.desktop_files);

    println!();
    println!("  {}", "binaries".dark_grey());
    if contents.binaries.is_empty() {
        println!("    none");
    }
    for candidate in rank(&contents.binaries) {
        println!(
            "    {}  {}",
            format!("{:>4}", candidate.score).dark_grey(),
            relative(&contents.root, &candidate.path)
        );
    }

    section(output, "icons", &contents.root, &contents.icons);
    Ok(())
}

fn section(output: &crate::ui::Output, title: &str, root: &Path, paths: &[PathBuf]) {
    if output.is_quiet() && paths.is_empty() {
        return;
    }
    println!();
    println!("  {}", title.dark_grey());
    if paths.is_empty() {
        println!("    none");
    }
    for path in paths {
        println!("    {}", relative(root, path));
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
