//! Command implementations, one module per subcommand.

pub mod analyze;
pub mod cleanup;
pub mod info;
pub mod install;
pub mod list;
pub mod scan;
pub mod uninstall;
pub mod untrack;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use crossterm::style::Stylize;
use tbi_core::InstallationRegistry;
use tbi_core::ops::Context;
use tbi_core::paths::Layout;
use tracing::debug;

use crate::ui::Output;

/// State every command starts from.
#[derive(Debug, Clone)]
pub struct Session {
    pub layout: Layout,
    pub output: Output,
    pub dry_run: bool,
    pub refresh_desktop_database: bool,
}

impl Session {
    /// Operation context for core install and uninstall calls.
    pub fn context(&self) -> Context {
        let ctx = Context::new(self.layout.clone(), Arc::new(self.output.clone()));
        if self.refresh_desktop_database {
            ctx
        } else {
            ctx.without_desktop_refresh()
        }
    }

    /// Load the registry without touching marker files.
    pub fn load_registry(&self) -> InstallationRegistry {
        InstallationRegistry::open(&self.layout)
    }

    /// Load the registry and pick up installations it lost track of.
    ///
    /// In dry-run mode the discovered records exist only in memory and the
    /// registry file is not written.
    pub fn open_registry(&self) -> Result<InstallationRegistry> {
        let mut registry = self.load_registry();
        let roots = self.layout.scan_roots();

        if self.dry_run {
            let pending = registry.discover(&roots);
            if pending > 0 {
                self.output.info(&format!(
                    "{pending} untracked installation(s) would be added to the registry"
                ));
            }
            return Ok(registry);
        }

        let added = registry
            .scan_roots(&roots)
            .context("Failed to save installation registry")?;
        if added > 0 {
            debug!(added, "reconciled registry with marker files");
        }
        Ok(registry)
    }
}

/// Ask a yes/no question on stdin. Anything but `y` is a no.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    println!();
    print!("  {} {prompt} (y/N) ", "WARNING:".bold().red());
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
