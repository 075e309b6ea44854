//! Unified UI output interface.
//!
//! Commands print through [`Output`]; core operations see the same handle
//! as a [`Reporter`]. Warnings and errors go to stderr, everything else to
//! stdout. Quiet mode drops sections, progress and info lines.

use crossterm::style::Stylize;
use tbi_core::Reporter;

use super::theme::Theme;

/// A cloneable handle for terminal output.
#[derive(Debug, Clone)]
pub struct Output {
    quiet: bool,
    theme: Theme,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            theme: Theme::default(),
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Prints a visual section header for an operation phase.
    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        println!();
        println!("  {}", title.bold());
    }

    /// Prints an operation's progress line.
    pub fn progress(&self, message: &str, percent: u8) {
        if self.quiet {
            return;
        }
        let pct = format!("{percent:>3}%");
        println!("  {} {}", pct.with(self.theme.colors.secondary), message);
    }

    /// Prints an informational message.
    pub fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        println!("  {}", msg.with(self.theme.colors.secondary));
    }

    /// Prints a success message. Shown even in quiet mode.
    pub fn success(&self, msg: &str) {
        println!(
            "  {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            msg
        );
    }

    pub fn warning(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            msg.with(self.theme.colors.warning)
        );
    }

    pub fn error(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            msg.with(self.theme.colors.error)
        );
    }

    /// Prints a `label  value` row, aligned to the theme's label column.
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        let lw = self.theme.layout.label_width;
        let label = format!("{label:<lw$}");
        println!("  {}{}", label.with(self.theme.colors.header), value);
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        self.section(title);
    }

    fn progress(&self, message: &str, percent: u8) {
        self.progress(message, percent);
    }

    fn info(&self, msg: &str) {
        self.info(msg);
    }

    fn success(&self, msg: &str) {
        self.success(msg);
    }

    fn warning(&self, msg: &str) {
        self.warning(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }
}
