//! Factories active over the historical timeline.

use chrono::Datelike;
use clap::Args;
use giudecca::config::{ConfigFile, FACTORIES_LAYER, TIMEPERIODS_LAYER};
use giudecca::factory::{Factory, Language};
use giudecca::feature::FeatureRecord;
use giudecca::timeline::{
    active_factories, earliest_opening_year, Timeline, TimelineState, Timeperiod,
};

use super::common::{feature_client, resolve_endpoint, LayerArgs};
use super::factories::LanguageArg;
use crate::error::CliError;

/// Arguments for the `timeline` command.
#[derive(Debug, Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub layer: LayerArgs,

    /// Show a single year instead of walking the whole timeline
    #[arg(long)]
    pub year: Option<i32>,

    /// Years advanced per step when walking the timeline
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(1..))]
    pub step: i32,

    /// Layer holding the historical periods (default: the "timeperiods" endpoint, if configured)
    #[arg(long)]
    pub periods: Option<String>,

    /// Attribute holding a period's start year
    #[arg(long, default_value = "Start_Date")]
    pub period_start_key: String,

    /// Attribute holding a period's end year
    #[arg(long, default_value = "End_Date")]
    pub period_end_key: String,

    /// Attribute holding a period's label
    #[arg(long, default_value = "Description")]
    pub period_label_key: String,

    /// Language of factory names
    #[arg(long, value_enum, default_value_t)]
    pub language: LanguageArg,
}

/// Print the timeline.
pub async fn run(args: TimelineArgs, config: &ConfigFile) -> Result<(), CliError> {
    let client = feature_client(config)?;

    let endpoint = args.layer.endpoint(config, FACTORIES_LAYER)?;
    let factories = to_factories(&client.query_features(&endpoint, None).await?, config);

    let periods: Vec<Timeperiod> = match periods_endpoint(&args, config)? {
        Some(endpoint) => client
            .query_features(&endpoint, None)
            .await?
            .iter()
            .filter_map(|record| {
                Timeperiod::from_record(
                    record,
                    &args.period_start_key,
                    &args.period_end_key,
                    &args.period_label_key,
                )
            })
            .collect(),
        None => Vec::new(),
    };

    let current_year = chrono::Local::now().year();
    let min_year = earliest_opening_year(&factories).unwrap_or(current_year);
    let timeline = Timeline::new(min_year, current_year, periods);
    let language = args.language.into();

    match args.year {
        Some(year) => {
            let start = TimelineState::start(&timeline);
            let state = start.step(year.saturating_sub(start.year), &timeline);
            print_year(&state, &timeline, &factories, language, true);
        }
        None => {
            let mut state = TimelineState::start(&timeline);
            loop {
                print_year(&state, &timeline, &factories, language, false);
                if state.is_present_day(&timeline) {
                    break;
                }
                state = state.step(args.step, &timeline);
            }
        }
    }

    Ok(())
}

fn periods_endpoint(args: &TimelineArgs, config: &ConfigFile) -> Result<Option<String>, CliError> {
    match &args.periods {
        Some(layer) => resolve_endpoint(config, layer).map(Some),
        None => Ok(config.endpoint(TIMEPERIODS_LAYER).map(str::to_string)),
    }
}

/// Factories of `records`, skipping records without a factory id.
fn to_factories(records: &[FeatureRecord], config: &ConfigFile) -> Vec<Factory> {
    records
        .iter()
        .filter_map(|record| match Factory::from_record(record, &config.attributes) {
            Ok(factory) => Some(factory),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping record");
                None
            }
        })
        .collect()
}

fn period_label(state: &TimelineState, timeline: &Timeline) -> String {
    if state.is_present_day(timeline) {
        return format!("({}) Modern day", timeline.current_year());
    }
    state
        .period_index
        .and_then(|i| timeline.periods().get(i))
        .map(|p| format!("({}-{}) {}", p.start_year, p.end_year, p.label))
        .unwrap_or_default()
}

fn print_year(
    state: &TimelineState,
    timeline: &Timeline,
    factories: &[Factory],
    language: Language,
    list_factories: bool,
) {
    let active: Vec<&Factory> = active_factories(factories, state.year).collect();
    println!(
        "{}  {:>3} active  {}",
        state.year,
        active.len(),
        period_label(state, timeline)
    );

    if list_factories {
        for factory in active {
            println!(
                "  {:>6}  {}",
                factory.factory_id,
                factory.display_name(language).unwrap_or("-")
            );
        }
    }
}
