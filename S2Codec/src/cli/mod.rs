//! S2Codec CLI - Command-line interface for Source 2 codec tools

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "s2codec")]
#[command(version, about = "S2Codec: decode Source 2 mesh and texture streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the S2Codec CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging (RUST_LOG=s2codec=debug for decoder traces)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
