//! Giudecca CLI - Command-line interface
//!
//! Queries the industrial-heritage feature layers of the Giudecca map:
//! raw features, hydrated factories, images, projections, filters and the
//! historical timeline.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use giudecca::config::ConfigFile;
use giudecca::logging::{init_logging, LoggingGuard};
use std::path::PathBuf;

use commands::{config, factories, features, filter, images, project, timeline};
use error::CliError;

#[derive(Parser)]
#[command(name = "giudecca")]
#[command(version = giudecca::VERSION)]
#[command(about = "Explore the industrial-heritage feature layers of the Giudecca", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.giudecca/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also print log output to stdout
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw feature records of a layer as JSON
    Features(features::FeaturesArgs),

    /// Fetch and hydrate factories, resolving their map positions
    Factories(factories::FactoriesArgs),

    /// List attachment (image) URLs per factory
    Images(images::ImagesArgs),

    /// Project a latitude/longitude onto the map image
    Project(project::ProjectArgs),

    /// Show which factories were active over the years
    Timeline(timeline::TimelineArgs),

    /// Filter the records of a layer by attribute
    #[command(subcommand)]
    Filter(filter::FilterCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };

    let _guard = start_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Features(args) => features::run(args, &config).await,
        Commands::Factories(args) => factories::run(args, &config).await,
        Commands::Images(args) => images::run(args, &config).await,
        Commands::Project(args) => project::run(args, &config),
        Commands::Timeline(args) => timeline::run(args, &config).await,
        Commands::Filter(command) => filter::run(command, &config).await,
        Commands::Config(command) => config::run(command, &config),
    }
}

fn start_logging(config: &ConfigFile, stdout_enabled: bool) -> Result<LoggingGuard, CliError> {
    let guard = init_logging(
        &config.logging.directory,
        &config.logging.file,
        stdout_enabled,
    )
    .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    tracing::info!(version = giudecca::VERSION, "Giudecca CLI started");
    Ok(guard)
}
