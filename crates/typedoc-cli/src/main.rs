//! typedoc - generate Markdown reference pages for Rust type packages

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod config;
mod driver;

use config::DriverConfig;

#[derive(Parser)]
#[command(name = "typedoc")]
#[command(version = typedoc_core::VERSION)]
#[command(about = "Generate Markdown documentation for type packages", long_about = None)]
struct Cli {
    /// Directory that group and index paths are resolved against
    #[arg(long)]
    root: Option<PathBuf>,

    /// TOML file replacing the built-in configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DriverConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => DriverConfig::builtin(),
    };

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let root = cli.root.unwrap_or_default();
    driver::run(config, &root)?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    run(cli).map_err(|err| {
        error!(target: "typedoc", "{err:#}");
        err
    })
}
