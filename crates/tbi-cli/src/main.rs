//! tbi - Tarball Installer CLI

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tbi_cli::cmd::{self, Session};
use tbi_cli::ui::Output;
use tbi_cli::{Cli, Commands, Layout};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let layout = Layout::from_env().context("Could not determine home directory")?;
    let session = Session {
        layout,
        output: Output::new(cli.quiet),
        dry_run: cli.dry_run,
        refresh_desktop_database: !cli.no_desktop_refresh,
    };

    match cli.command {
        Commands::Analyze { archive } => cmd::analyze::analyze(&session, &archive).await,
        Commands::Install {
            archive,
            binary,
            system,
        } => cmd::install::install(&session, &archive, binary, system).await,
        Commands::Uninstall { app_id, yes } => {
            cmd::uninstall::uninstall(&session, &app_id, yes).await
        }
        Commands::Untrack { app_id } => cmd::untrack::untrack(&session, &app_id),
        Commands::List => cmd::list::list(&session),
        Commands::Info { app_id } => cmd::info::info(&session, &app_id),
        Commands::Scan => cmd::scan::scan(&session),
        Commands::Cleanup { yes } => cmd::cleanup::cleanup(&session, yes),
    }
}
