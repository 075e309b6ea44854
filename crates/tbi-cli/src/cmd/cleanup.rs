//! Cleanup command (orphaned marker collection)

use anyhow::Result;

use super::{Session, confirm};

/// Delete marker files under the home directory that no tracked application owns
pub fn cleanup(session: &Session, yes: bool) -> Result<()> {
    let output = &session.output;
    let registry = session.load_registry();
    let home = session.layout.home();

    output.info(&format!("Searching {} for marker files...", home.display()));
    let survey = registry.survey_markers(home);

    if survey.orphans.is_empty() {
        output.success(&format!("{} marker(s) found, none orphaned", survey.found));
        return Ok(());
    }

    output.section("Orphaned markers");
    for path in &survey.orphans {
        output.info(&path.display().to_string());
    }

    if session.dry_run {
        output.success(&format!(
            "{} orphaned marker(s) would be removed",
            survey.orphans.len()
        ));
        return Ok(());
    }

    if !yes && !confirm("This will delete the marker files listed above. Continue?")? {
        output.error("Operation cancelled");
        return Ok(());
    }

    let report = registry.cleanup_orphaned_markers(home);
    output.success(&format!(
        "{} marker(s) found, {} orphaned marker(s) removed",
        report.found, report.removed
    ));
    if report.removed < survey.orphans.len() {
        output.warning(&format!(
            "{} orphaned marker(s) could not be removed",
            survey.orphans.len() - report.removed
        ));
    }
    Ok(())
}
