//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use clap::Subcommand;
use giudecca::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a commented configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &ConfigFile) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(config),
        ConfigCommands::Init { force } => run_init(force),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Show the effective configuration, with the API token masked.
fn run_show(config: &ConfigFile) -> Result<(), CliError> {
    println!("[service]");
    println!(
        "  api_token = {}",
        if config.service.api_token.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("  timeout = {}", config.service.timeout);
    println!(
        "  max_concurrent_lookups = {}",
        config.service.max_concurrent_lookups
    );

    println!();
    println!("[endpoints]");
    if config.endpoints.is_empty() {
        println!("  (none)");
    }
    for (layer, url) in &config.endpoints {
        println!("  {} = {}", layer, url);
    }

    let map = &config.map;
    println!();
    println!("[map]");
    println!("  latitude = {} .. {}", map.min_lat(), map.max_lat());
    println!("  longitude = {} .. {}", map.min_lon(), map.max_lon());
    println!("  size = {}x{}", map.width(), map.height());

    let keys = &config.attributes;
    println!();
    println!("[attributes]");
    for (name, key) in [
        ("factory_id", &keys.factory_id),
        ("object_id", &keys.object_id),
        ("english_name", &keys.english_name),
        ("italian_name", &keys.italian_name),
        ("opening_year", &keys.opening_year),
        ("closing_year", &keys.closing_year),
        ("latitude", &keys.latitude),
        ("longitude", &keys.longitude),
    ] {
        println!("  {} = {}", name, key);
    }

    println!();
    println!("[relational_filters]");
    for (filter, layer) in config.relational_filters.iter() {
        println!("  {} = {}", filter, layer);
    }

    println!();
    println!("[logging]");
    println!(
        "  file = {}",
        config.logging.directory.join(&config.logging.file).display()
    );

    Ok(())
}

/// Write the default configuration file.
fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
