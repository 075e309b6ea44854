use anyhow::Result;

use super::Session;
use crate::ui::list::{print_list_footer, print_list_header, print_list_row};

/// List tracked applications
pub fn list(session: &Session) -> Result<()> {
    let registry = session.load_registry();
    let records = registry.list();

    if records.is_empty() {
        println!();
        println!("  No applications tracked.");
        println!("  Run 'tbi install <archive>' to get started, or 'tbi scan' to find earlier installs.");
        return Ok(());
    }

    let theme = session.output.theme();
    print_list_header(theme);
    for record in records {
        print_list_row(theme, record);
    }
    let discovered = records.iter().filter(|r| r.discovered).count();
    print_list_footer(theme, records.len(), discovered);
    Ok(())
}
