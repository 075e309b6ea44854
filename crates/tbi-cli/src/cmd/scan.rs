//! Scan command

use anyhow::{Context, Result};

use super::Session;

/// Track every marker-bearing installation the registry has lost
pub fn scan(session: &Session) -> Result<()> {
    let output = &session.output;
    let mut registry = session.load_registry();

    output.section("Scanning for installations");
    for root in session.layout.scan_roots() {
        output.info(&root.display().to_string());
    }

    if session.dry_run {
        let untracked = registry.discover(&session.layout.scan_roots());
        output.success(&format!("{untracked} untracked installation(s) would be added"));
        return Ok(());
    }

    let added = registry
        .scan_existing_installations(&session.layout)
        .context("Failed to save installation registry")?;
    output.success(&format!(
        "{added} installation(s) added, {} tracked",
        registry.len()
    ));
    Ok(())
}
