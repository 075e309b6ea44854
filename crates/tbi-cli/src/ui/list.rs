//! List output formatting
//!
//! Column-aligned rendering for `tbi list`.

use crossterm::style::Stylize;
use tbi_schema::InstallationRecord;

use super::theme::Theme;

/// Print column headers for `tbi list`
pub fn print_list_header(theme: &Theme) {
    let header = format!(
        "  {:<nw$} {:<vw$} {:<iw$} {}",
        "name",
        "version",
        "app id",
        "installed",
        nw = theme.layout.name_width,
        vw = theme.layout.version_width,
        iw = theme.layout.id_width,
    );
    println!();
    println!("{}", header.with(theme.colors.header));
}

/// Print a single row for `tbi list`
///
/// Discovered records (rebuilt from a marker) are flagged with `*`.
pub fn print_list_row(theme: &Theme, record: &InstallationRecord) {
    let name = if record.discovered {
        format!("{}*", record.app_name)
    } else {
        record.app_name.clone()
    };
    let name_part = format!("{name:<width$}", width = theme.layout.name_width);
    let version_part = format!(
        "{:<width$}",
        record.app_version,
        width = theme.layout.version_width
    );
    let id_part = format!("{:<width$}", record.app_id, width = theme.layout.id_width);

    println!(
        "  {} {} {} {}",
        name_part.with(theme.colors.app_name),
        version_part.with(theme.colors.version),
        id_part.with(theme.colors.secondary),
        install_date(&record.install_time).with(theme.colors.secondary)
    );
}

/// Print footer for `tbi list`
pub fn print_list_footer(theme: &Theme, count: usize, discovered: usize) {
    println!();
    let mut msg = format!(
        "  {count} application{}",
        if count == 1 { "" } else { "s" }
    );
    if discovered > 0 {
        msg.push_str(&format!(", {discovered} discovered from markers (*)"));
    }
    println!("{}", msg.with(theme.colors.secondary));
}

/// Date part of an ISO-8601 timestamp.
fn install_date(install_time: &str) -> &str {
    install_time.split('T').next().unwrap_or(install_time)
}
