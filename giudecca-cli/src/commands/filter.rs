//! Client-side attribute filters.
//!
//! Each filter fetches every record of a layer and narrows them locally.
//! When the filtered attribute is a relational filter (e.g. `Product`), the
//! layer defaults to the over-time layer configured for it.

use clap::{Args, Subcommand};
use giudecca::config::{ConfigFile, FACTORIES_LAYER};
use giudecca::feature::FeatureRecord;
use giudecca::filter::{
    filter_by_date_range, filter_by_dual_range, filter_by_substring, AttributeMatch, DualRange,
};

use super::common::{feature_client, print_json, LayerArgs};
use crate::error::CliError;

/// Options shared by all filters.
#[derive(Debug, Args)]
pub struct CommonFilterArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Attribute whose values are printed for matching records
    #[arg(long, default_value = "Factory_ID")]
    pub return_key: String,
}

/// Interval attributes, defaulting to the configured opening/closing years.
#[derive(Debug, Args)]
pub struct IntervalKeys {
    /// Attribute holding the interval start
    #[arg(long)]
    pub start_key: Option<String>,

    /// Attribute holding the interval end
    #[arg(long)]
    pub end_key: Option<String>,
}

impl IntervalKeys {
    fn resolve<'a>(&'a self, config: &'a ConfigFile) -> (&'a str, &'a str) {
        (
            self.start_key
                .as_deref()
                .unwrap_or(&config.attributes.opening_year),
            self.end_key
                .as_deref()
                .unwrap_or(&config.attributes.closing_year),
        )
    }
}

/// Filter subcommands.
#[derive(Debug, Subcommand)]
pub enum FilterCommands {
    /// Case-insensitive substring match on a text attribute
    Substring {
        /// Attribute to search
        #[arg(long)]
        attribute: String,

        /// Text to look for
        query: String,

        #[command(flatten)]
        common: CommonFilterArgs,
    },

    /// Records whose interval nests with [min, max]
    #[command(allow_negative_numbers = true)]
    Range {
        /// Lower bound (inclusive)
        min: f64,

        /// Upper bound (inclusive)
        max: f64,

        #[command(flatten)]
        keys: IntervalKeys,

        /// Attribute that must also equal --target-value
        #[arg(long, requires = "target_value")]
        target_key: Option<String>,

        /// Value required for --target-key
        #[arg(long, requires = "target_key")]
        target_value: Option<String>,

        #[command(flatten)]
        common: CommonFilterArgs,
    },

    /// Records whose interval lies inside [min, max] and whose target lies
    /// inside [min-target, max-target]
    #[command(allow_negative_numbers = true)]
    DualRange {
        /// Lower bound of the interval (inclusive)
        min: f64,

        /// Upper bound of the interval (inclusive)
        max: f64,

        /// Numeric attribute checked against the target range
        #[arg(long)]
        target_key: String,

        /// Lower bound of the target (inclusive)
        #[arg(long)]
        min_target: f64,

        /// Upper bound of the target (inclusive)
        #[arg(long)]
        max_target: f64,

        #[command(flatten)]
        keys: IntervalKeys,

        #[command(flatten)]
        common: CommonFilterArgs,
    },
}

/// Run a filter subcommand and print the matching values as JSON.
pub async fn run(command: FilterCommands, config: &ConfigFile) -> Result<(), CliError> {
    let values = match &command {
        FilterCommands::Substring {
            attribute,
            query,
            common,
        } => {
            let records = fetch(config, common, Some(attribute.as_str())).await?;
            filter_by_substring(&records, attribute, query, &common.return_key)
        }
        FilterCommands::Range {
            min,
            max,
            keys,
            target_key,
            target_value,
            common,
        } => {
            let records = fetch(config, common, target_key.as_deref()).await?;
            let (start_key, end_key) = keys.resolve(config);
            let target = target_key
                .as_deref()
                .zip(target_value.as_deref())
                .map(|(key, value)| AttributeMatch { key, value });

            filter_by_date_range(
                &records,
                *min,
                *max,
                start_key,
                end_key,
                target,
                &common.return_key,
            )
        }
        FilterCommands::DualRange {
            min,
            max,
            target_key,
            min_target,
            max_target,
            keys,
            common,
        } => {
            let records = fetch(config, common, Some(target_key.as_str())).await?;
            let (start_key, end_key) = keys.resolve(config);
            let range = DualRange {
                min: *min,
                max: *max,
                start_key,
                end_key,
                target_key,
                min_target: *min_target,
                max_target: *max_target,
            };

            filter_by_dual_range(&records, &range, &common.return_key)
        }
    };

    tracing::debug!(matches = values.len(), "Filter applied");
    print_json(&values)
}

/// Layer queried for a filter on `attribute`.
fn default_layer<'a>(config: &'a ConfigFile, attribute: Option<&str>) -> &'a str {
    attribute
        .and_then(|a| config.relational_filters.layer_for(a))
        .unwrap_or(FACTORIES_LAYER)
}

async fn fetch(
    config: &ConfigFile,
    common: &CommonFilterArgs,
    attribute: Option<&str>,
) -> Result<Vec<FeatureRecord>, CliError> {
    let endpoint = common
        .layer
        .endpoint(config, default_layer(config, attribute))?;
    Ok(feature_client(config)?.query_features(&endpoint, None).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layer_for_relational_attribute() {
        let config = ConfigFile::default();

        assert_eq!(default_layer(&config, Some("Product")), "Product_Over_Time");
        assert_eq!(
            default_layer(&config, Some("Min_Employment")),
            "Employment_Over_Time"
        );
        assert_eq!(default_layer(&config, Some("English_Name")), FACTORIES_LAYER);
        assert_eq!(default_layer(&config, None), FACTORIES_LAYER);
    }

    #[test]
    fn test_interval_keys_default_to_years() {
        let config = ConfigFile::default();
        let keys = IntervalKeys {
            start_key: Some("Start_Date".to_string()),
            end_key: None,
        };

        assert_eq!(keys.resolve(&config), ("Start_Date", "Closing_Year"));
    }
}
