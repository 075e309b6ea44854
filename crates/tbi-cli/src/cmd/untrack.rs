//! Untrack command

use anyhow::{Context, Result, bail};

use super::Session;

/// Forget an application without touching its files.
///
/// Its marker stays on disk, so a later `tbi scan` finds it again.
pub fn untrack(session: &Session, app_id: &str) -> Result<()> {
    let output = &session.output;
    let mut registry = session.load_registry();
    let Some(record) = registry.lookup(app_id) else {
        bail!("Application '{app_id}' is not tracked");
    };
    let name = record.app_name.clone();

    if session.dry_run {
        output.info(&format!("Would stop tracking {name}"));
        return Ok(());
    }

    registry
        .remove(app_id)
        .context("Failed to save installation registry")?;
    output.success(&format!("Stopped tracking {name}"));
    Ok(())
}
