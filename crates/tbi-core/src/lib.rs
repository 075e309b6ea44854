pub mod analyzer;
pub mod io;
pub mod marker;
pub mod ops;
pub mod paths;
pub mod registry;
pub mod walk;

pub mod reporter;

pub use paths::*;
pub use registry::{CleanupReport, InstallationRegistry, RegistryError};
pub use reporter::{NullReporter, Reporter};
