//! Raw feature records of a layer.

use clap::Args;
use giudecca::config::{ConfigFile, FACTORIES_LAYER};

use super::common::{feature_client, print_json, LayerArgs};
use crate::error::CliError;

/// Arguments for the `features` command.
#[derive(Debug, Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Server-side predicate (SQL-92 where clause), default: all features
    #[arg(long = "where", short)]
    pub predicate: Option<String>,

    /// Print only the number of matching features
    #[arg(long)]
    pub count: bool,
}

/// Query a layer and print its records as JSON.
pub async fn run(args: FeaturesArgs, config: &ConfigFile) -> Result<(), CliError> {
    let endpoint = args.layer.endpoint(config, FACTORIES_LAYER)?;
    let records = feature_client(config)?
        .query_features(&endpoint, args.predicate.as_deref())
        .await?;

    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    print_json(&records)
}
