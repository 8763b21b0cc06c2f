use anyhow::Result;
use clap::Parser;
use gp2als_core::ImportConfig;
use std::path::PathBuf;

mod commands;

/// Import Guitar Pro rehearsal marks into an Ableton Live set as locators.
///
/// The set is rewritten in place. The previous version is kept next to it
/// as `<name>_old.als`; the import refuses to run if that file already
/// exists.
#[derive(Debug, Parser)]
#[command(name = "gp2als", version, about)]
struct Cli {
    /// Path to the Ableton Live set (the .als extension is optional)
    project: PathBuf,

    /// MusicXML file exported from Guitar Pro
    notation: PathBuf,
}

impl From<Cli> for ImportConfig {
    fn from(cli: Cli) -> Self {
        Self::new(cli.project, cli.notation)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ImportConfig::from(Cli::parse());
    commands::run_import(config)
}
