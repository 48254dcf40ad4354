//! Hydrated factories with their map positions.

use clap::{Args, ValueEnum};
use giudecca::config::{ConfigFile, FACTORIES_LAYER};
use giudecca::factory::{log_failures, Factory, Language};

use super::common::{hydrator, print_json, LayerArgs};
use crate::error::CliError;

/// Display language for factory names.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum LanguageArg {
    #[default]
    En,
    It,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::English,
            LanguageArg::It => Language::Italian,
        }
    }
}

/// Arguments for the `factories` command.
#[derive(Debug, Args)]
pub struct FactoriesArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Server-side predicate (SQL-92 where clause), default: all factories
    #[arg(long = "where", short)]
    pub predicate: Option<String>,

    /// Language of factory names in table output
    #[arg(long, value_enum, default_value_t)]
    pub language: LanguageArg,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Fetch, hydrate and print factories.
pub async fn run(args: FactoriesArgs, config: &ConfigFile) -> Result<(), CliError> {
    let endpoint = args.layer.endpoint(config, FACTORIES_LAYER)?;
    let report = hydrator(config)?
        .try_fetch_factories(&endpoint, args.predicate.as_deref())
        .await?;

    log_failures(&report.failures);

    if args.json {
        print_json(&report.factories)?;
    } else {
        print_table(&report.factories, args.language.into());
    }

    if !report.is_complete() {
        eprintln!(
            "{} of {} factories could not be hydrated (see log)",
            report.failures.len(),
            report.factories.len() + report.failures.len()
        );
    }

    Ok(())
}

fn print_table(factories: &[Factory], language: Language) {
    println!("{:>6}  {:<40}  {:>11}  {:>17}", "ID", "Name", "Years", "Position");
    for factory in factories {
        println!(
            "{:>6}  {:<40}  {:>11}  {:>17}",
            factory.factory_id,
            factory.display_name(language).unwrap_or("-"),
            format_years(factory),
            factory
                .position
                .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
}

fn format_years(factory: &Factory) -> String {
    let year = |y: Option<i32>| y.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string());
    format!("{}-{}", year(factory.opening_year), year(factory.closing_year))
}
