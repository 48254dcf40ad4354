//! Common types and utilities shared across CLI commands.

use clap::Args;
use giudecca::config::ConfigFile;
use giudecca::factory::Hydrator;
use giudecca::service::{AsyncReqwestClient, FeatureLayerClient};
use serde::Serialize;

use crate::error::CliError;

/// Layer selection shared by commands that query the feature service.
#[derive(Debug, Clone, Args)]
pub struct LayerArgs {
    /// Layer name from the [endpoints] config section, or a full layer URL
    #[arg(long, short)]
    pub layer: Option<String>,
}

impl LayerArgs {
    /// Resolves the layer, falling back to `default_layer`.
    pub fn endpoint(&self, config: &ConfigFile, default_layer: &str) -> Result<String, CliError> {
        resolve_endpoint(config, self.layer.as_deref().unwrap_or(default_layer))
    }
}

/// Maps a layer name or URL to a feature layer URL.
pub fn resolve_endpoint(config: &ConfigFile, layer: &str) -> Result<String, CliError> {
    if layer.starts_with("http://") || layer.starts_with("https://") {
        return Ok(layer.trim_end_matches('/').to_string());
    }

    config
        .endpoint(layer)
        .map(str::to_string)
        .ok_or_else(|| CliError::UnknownLayer(layer.to_string()))
}

/// Creates a feature layer client from the service settings.
pub fn feature_client(
    config: &ConfigFile,
) -> Result<FeatureLayerClient<AsyncReqwestClient>, CliError> {
    let http = AsyncReqwestClient::with_timeout(config.service.timeout)
        .map_err(CliError::ClientCreation)?;

    let client = FeatureLayerClient::new(http);
    Ok(match &config.service.api_token {
        Some(token) => client.with_api_token(token.clone()),
        None => client,
    })
}

/// Creates a hydrator using the configured keys, bounds and concurrency.
pub fn hydrator(config: &ConfigFile) -> Result<Hydrator<AsyncReqwestClient>, CliError> {
    Ok(Hydrator::new(feature_client(config)?)
        .with_keys(config.attributes.clone())
        .with_bounds(config.map)
        .with_max_concurrent(config.service.max_concurrent_lookups))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
