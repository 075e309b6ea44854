//! Reporter trait for dependency injection
//!
//! This trait allows install and uninstall logic to report progress and
//! status without being coupled to a specific terminal or GUI front end.

pub trait Reporter: Send + Sync {
    /// Indicates a new section or phase has started (e.g. "Extracting", "Installing").
    fn section(&self, title: &str);

    /// Reports overall progress of the running operation, 0-100.
    fn progress(&self, message: &str, percent: u8);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn progress(&self, message: &str, percent: u8) {
        (**self).progress(message, percent);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn progress(&self, _: &str, _: u8) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
