//! Timeline queries
//!
//! The historical timeline walks from the earliest opening year up to the
//! present. Its position is an explicit [`TimelineState`] value that callers
//! thread through [`TimelineState::step`]; nothing is kept globally.

use crate::factory::Factory;
use crate::feature::FeatureRecord;

/// A named historical period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeperiod {
    pub start_year: i32,
    pub end_year: i32,
    pub label: String,
}

impl Timeperiod {
    /// Reads a period from a record of the time periods layer.
    ///
    /// Returns `None` if either year is missing. A missing label becomes
    /// empty.
    pub fn from_record(
        record: &FeatureRecord,
        start_key: &str,
        end_key: &str,
        label_key: &str,
    ) -> Option<Self> {
        let year = |key: &str| record.integer(key).and_then(|y| i32::try_from(y).ok());

        Some(Self {
            start_year: year(start_key)?,
            end_year: year(end_key)?,
            label: record.text(label_key).unwrap_or_default().to_string(),
        })
    }
}

/// The span of the timeline and its periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    min_year: i32,
    current_year: i32,
    periods: Vec<Timeperiod>,
}

impl Timeline {
    /// Creates a timeline from `min_year` to `current_year`.
    ///
    /// Periods are ordered by start year. A `current_year` before
    /// `min_year` collapses the timeline to that single year.
    pub fn new(min_year: i32, current_year: i32, mut periods: Vec<Timeperiod>) -> Self {
        periods.sort_by_key(|p| p.start_year);
        Self {
            min_year,
            current_year: current_year.max(min_year),
            periods,
        }
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn periods(&self) -> &[Timeperiod] {
        &self.periods
    }

    /// Index of the period shown for `year`.
    ///
    /// A period stays shown from its start year until the next period
    /// starts, which also covers gaps between periods. After the end of the
    /// last period, and before the first one starts, no period is shown.
    pub fn period_for_year(&self, year: i32) -> Option<usize> {
        let index = self.periods.iter().rposition(|p| p.start_year <= year)?;
        let has_next = index + 1 < self.periods.len();

        if year <= self.periods[index].end_year || has_next {
            Some(index)
        } else {
            None
        }
    }
}

/// Position of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineState {
    pub year: i32,
    pub period_index: Option<usize>,
}

impl TimelineState {
    /// State at the start of the timeline.
    pub fn start(timeline: &Timeline) -> Self {
        Self::at(timeline, timeline.min_year())
    }

    /// State at the end (present day) of the timeline.
    pub fn end(timeline: &Timeline) -> Self {
        Self::at(timeline, timeline.current_year())
    }

    fn at(timeline: &Timeline, year: i32) -> Self {
        Self {
            year,
            period_index: timeline.period_for_year(year),
        }
    }

    /// Moves the timeline by `delta` years.
    ///
    /// The year never leaves `[min_year, current_year]`.
    #[must_use]
    pub fn step(self, delta: i32, timeline: &Timeline) -> Self {
        let year = self
            .year
            .saturating_add(delta)
            .clamp(timeline.min_year(), timeline.current_year());
        Self::at(timeline, year)
    }

    /// True once the timeline has reached the present.
    pub fn is_present_day(&self, timeline: &Timeline) -> bool {
        self.year >= timeline.current_year()
    }
}

/// Factories operating during `year`.
pub fn active_factories(factories: &[Factory], year: i32) -> impl Iterator<Item = &Factory> {
    factories.iter().filter(move |f| f.is_active_in(year))
}

/// Earliest opening year among `factories`.
pub fn earliest_opening_year(factories: &[Factory]) -> Option<i32> {
    factories.iter().filter_map(|f| f.opening_year).min()
}
