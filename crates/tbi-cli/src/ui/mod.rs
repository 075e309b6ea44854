//! Terminal output for the `tbi` commands.
//!
//! - [`theme`] - colors, icons and column widths
//! - [`output`] - the [`Output`] handle commands print through; also the
//!   [`Reporter`](tbi_core::Reporter) core operations talk to
//! - [`list`] - column-aligned rendering for `tbi list`

pub mod list;
pub mod output;
pub mod theme;

pub use output::Output;
pub use theme::Theme;
