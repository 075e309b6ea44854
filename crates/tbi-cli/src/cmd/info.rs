//! Info command

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use super::Session;

/// Show everything recorded about one application
pub fn info(session: &Session, app_id: &str) -> Result<()> {
    let output = &session.output;
    let registry = session.load_registry();
    let Some(record) = registry.lookup(app_id) else {
        bail!("Application '{app_id}' is not tracked");
    };

    println!();
    println!(
        "  {} {}",
        record.app_name.as_str().white().bold(),
        record.app_version.as_str().dark_grey()
    );
    println!();
    output.field("app id", &record.app_id);
    output.field("source", &record.source_filename);
    if let Some(source) = &record.source_file {
        output.field("archive", source.display());
    }
    output.field("installed", &record.install_time);
    output.field("type", record.install_type);
    if let Some(version) = &record.installer_version {
        output.field("installer", version);
    }
    if let Some(dir) = &record.app_install_dir {
        output.field("location", dir.display());
    }
    if let Some(binary) = &record.main_binary {
        output.field("main binary", binary.display());
    }
    if record.discovered {
        output.field("discovered", "rebuilt from a marker file");
    }

    if !record.installed_files.is_empty() {
        println!();
        println!("  {}", "files".dark_grey());
        for path in &record.installed_files {
            println!("    {}", path.display());
        }
    }
    if !record.marker_files.is_empty() {
        println!();
        println!("  {}", "markers".dark_grey());
        for path in &record.marker_files {
            println!("    {}", path.display());
        }
    }
    Ok(())
}
