//! Attachment (image) URLs of factories.

use clap::Args;
use giudecca::config::{ConfigFile, FACTORIES_LAYER};
use giudecca::factory::{log_failures, Factory, HydrationError};

use super::common::{hydrator, print_json, LayerArgs};
use crate::error::CliError;

/// Arguments for the `images` command.
#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Only list the images of this factory id
    #[arg(long)]
    pub factory: Option<i64>,
}

/// Print image URLs as JSON, keyed by factory id.
pub async fn run(args: ImagesArgs, config: &ConfigFile) -> Result<(), CliError> {
    let endpoint = args.layer.endpoint(config, FACTORIES_LAYER)?;
    let hydrator = hydrator(config)?;

    match args.factory {
        Some(factory_id) => {
            let predicate = format!("{} = {}", config.attributes.factory_id, factory_id);
            let records = hydrator
                .client()
                .query_features(&endpoint, Some(&predicate))
                .await?;
            let record = records
                .first()
                .ok_or(HydrationError::ObjectNotFound { factory_id })?;
            let factory = Factory::from_record(record, &config.attributes)?;

            let urls = hydrator.factory_images(&endpoint, &factory).await?;
            print_json(&urls)
        }
        None => {
            let report = hydrator.fetch_all_factory_images(&endpoint).await?;
            log_failures(&report.failures);
            if !report.failures.is_empty() {
                eprintln!("{} factories skipped (see log)", report.failures.len());
            }
            print_json(&report.images)
        }
    }
}
