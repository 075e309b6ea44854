//! tbi - Tarball Installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Installs application tarballs into the user's home directory and keeps
//! track of them so they can be removed later.
//!
//! # Directory Layout
//!
//! ```text
//! ~/
//! ├── Applications/<app>/            # Copied package tree + marker file
//! ├── .local/bin/<binary>            # Launcher scripts
//! ├── .local/share/applications/     # Desktop entries
//! ├── .local/share/icons/hicolor/    # Icons
//! └── .local/share/tarball-installer/installations.json   # Registry
//! ```

pub mod cmd;
pub mod ui;

pub use tbi_core::paths::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tbi")]
#[command(author, version, about = "tbi - install and track Linux application tarballs")]
pub struct Cli {
    /// Show what would happen without making changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not run update-desktop-database after touching desktop entries
    #[arg(long, global = true, env = "TBI_NO_DESKTOP_REFRESH")]
    pub no_desktop_refresh: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show what a tarball contains and which binary would be launched
    Analyze {
        /// Tarball (.tar, .tar.gz, .tar.bz2, .tar.xz, .tar.zst and short forms)
        archive: PathBuf,
    },
    /// Install a tarball for the current user
    Install {
        /// Tarball (.tar, .tar.gz, .tar.bz2, .tar.xz, .tar.zst and short forms)
        archive: PathBuf,
        /// Main binary, relative to the package root (overrides detection)
        #[arg(long)]
        binary: Option<PathBuf>,
        /// Request a system-wide install (falls back to a user install)
        #[arg(long)]
        system: bool,
    },
    /// Remove an installed application and its files
    Uninstall {
        /// Application id, as shown by `tbi list`
        app_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Stop tracking an application without deleting its files
    Untrack {
        /// Application id, as shown by `tbi list`
        app_id: String,
    },
    /// List tracked applications
    List,
    /// Show everything recorded about one application
    Info {
        /// Application id, as shown by `tbi list`
        app_id: String,
    },
    /// Rebuild tracking from marker files left by earlier installs
    Scan,
    /// Delete marker files that no tracked application owns
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
