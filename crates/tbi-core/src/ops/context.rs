//! Shared operation context.
//!
//! Groups the state every install and uninstall needs: where files go and
//! who hears about progress.

use std::fmt;
use std::sync::Arc;

use crate::paths::Layout;
use crate::reporter::Reporter;

#[derive(Clone)]
pub struct Context {
    pub layout: Layout,
    pub reporter: Arc<dyn Reporter>,
    /// Run `update-desktop-database` after touching desktop entries.
    pub refresh_desktop_database: bool,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("refresh_desktop_database", &self.refresh_desktop_database)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(layout: Layout, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            layout,
            reporter,
            refresh_desktop_database: true,
        }
    }

    /// Skip `update-desktop-database`.
    pub fn without_desktop_refresh(mut self) -> Self {
        self.refresh_desktop_database = false;
        self
    }
}
