//! Client-side attribute filters over fetched feature records.
//!
//! All filters are pure and total: a record missing any key a filter needs
//! is left out of the result. Each filter returns the value of `return_key`
//! of every matching record, in input order.

use crate::feature::{AttributeValue, FeatureRecord};

/// An attribute that must equal a given value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMatch<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Bounds of a dual-range filter.
///
/// A record matches when its `[start_key, end_key]` interval lies inside
/// `[min, max]` and its `target_key` value lies inside
/// `[min_target, max_target]`. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualRange<'a> {
    pub min: f64,
    pub max: f64,
    pub start_key: &'a str,
    pub end_key: &'a str,
    pub target_key: &'a str,
    pub min_target: f64,
    pub max_target: f64,
}

fn return_values<'r, I>(matches: I, return_key: &str) -> Vec<AttributeValue>
where
    I: Iterator<Item = &'r FeatureRecord>,
{
    matches
        .filter_map(|record| record.attribute(return_key).cloned())
        .collect()
}

/// The `[start, end]` interval of a record, if both ends are numeric.
fn interval(record: &FeatureRecord, start_key: &str, end_key: &str) -> Option<(f64, f64)> {
    Some((record.number(start_key)?, record.number(end_key)?))
}

/// Case-insensitive substring match on a text attribute.
///
/// # Example
///
/// ```
/// use giudecca::feature::{AttributeValue, FeatureRecord};
/// use giudecca::filter::filter_by_substring;
///
/// let records = vec![FeatureRecord::from_attributes([
///     ("Name", AttributeValue::from("Cotton Mill")),
///     ("Factory_ID", AttributeValue::Integer(1)),
/// ])];
///
/// let ids = filter_by_substring(&records, "Name", "cotton", "Factory_ID");
/// assert_eq!(ids, vec![AttributeValue::Integer(1)]);
/// ```
pub fn filter_by_substring(
    records: &[FeatureRecord],
    attribute_key: &str,
    query: &str,
    return_key: &str,
) -> Vec<AttributeValue> {
    let query = query.to_lowercase();
    let matches = records.iter().filter(|record| {
        record
            .text(attribute_key)
            .is_some_and(|value| value.to_lowercase().contains(&query))
    });
    return_values(matches, return_key)
}

/// Keeps records whose `[start, end]` interval and `[min, max]` nest.
///
/// A record matches when its interval lies inside `[min, max]`, or when it
/// spans all of `[min, max]`. Intervals that only partially overlap the
/// bounds do not match. With `target`, the record must also carry that
/// attribute value (numbers compare numerically).
pub fn filter_by_date_range(
    records: &[FeatureRecord],
    min: f64,
    max: f64,
    start_key: &str,
    end_key: &str,
    target: Option<AttributeMatch<'_>>,
    return_key: &str,
) -> Vec<AttributeValue> {
    let matches = records.iter().filter(|record| {
        let Some((start, end)) = interval(record, start_key, end_key) else {
            return false;
        };

        let inside = start >= min && end <= max;
        let spanning = start <= min && end >= max;

        let target_matches = target.map_or(true, |t| {
            record
                .attribute(t.key)
                .is_some_and(|value| value.matches_text(t.value))
        });

        (inside || spanning) && target_matches
    });
    return_values(matches, return_key)
}

/// Keeps records matching both ranges of `range`.
///
/// Bounds that cannot both hold (e.g. `min_target > max_target`) yield an
/// empty result.
pub fn filter_by_dual_range(
    records: &[FeatureRecord],
    range: &DualRange<'_>,
    return_key: &str,
) -> Vec<AttributeValue> {
    let matches = records.iter().filter(|record| {
        let Some((start, end)) = interval(record, range.start_key, range.end_key) else {
            return false;
        };
        let Some(target) = record.number(range.target_key) else {
            return false;
        };

        start >= range.min
            && end <= range.max
            && target >= range.min_target
            && target <= range.max_target
    });
    return_values(matches, return_key)
}
