use crate::domain::asset::AssetProfile;
use crate::domain::projection::{
    AccuracyLevel, MethodContribution, RawHit, ScoredResult, TimeWindow,
};
use crate::time::calendar::days_between;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

pub const MAX_STRENGTH: u8 = 5;
/// Strength at or above which a result counts as strong (and gets a window under high accuracy).
pub const STRONG_STRENGTH: u8 = 4;
pub const CRITICAL_STRENGTH: u8 = 5;

const WINDOW_HALF_WIDTH: Days = Days::new(2);

#[derive(Debug, Default)]
struct Bucket {
    contributions: Vec<MethodContribution>,
    total_strength: f64,
}

/// Merges raw hits from all selected methods into one scored result per future calendar day.
///
/// Hits on or before `base_date` are dropped. Contributions keep encounter order. Results come
/// out in ascending date order.
pub fn aggregate(
    hits: impl IntoIterator<Item = RawHit>,
    base_date: NaiveDate,
    profile: &AssetProfile,
    accuracy: AccuracyLevel,
) -> Vec<ScoredResult> {
    let mut buckets = BTreeMap::<NaiveDate, Bucket>::new();

    for hit in hits {
        if hit.date <= base_date {
            continue;
        }
        let weight = profile.weights.get(hit.method);
        let bucket = buckets.entry(hit.date).or_default();
        bucket.total_strength += weight;
        bucket.contributions.push(MethodContribution {
            method: hit.method,
            detail: hit.detail,
            weight,
        });
    }

    buckets
        .into_iter()
        .map(|(date, bucket)| finalize(date, bucket, base_date, profile, accuracy))
        .collect()
}

pub fn strength_level(total_strength: f64) -> u8 {
    let level = total_strength.ceil().clamp(1.0, f64::from(MAX_STRENGTH));
    level as u8
}

fn finalize(
    date: NaiveDate,
    bucket: Bucket,
    base_date: NaiveDate,
    profile: &AssetProfile,
    accuracy: AccuracyLevel,
) -> ScoredResult {
    let strength_level = strength_level(bucket.total_strength);

    let time_window = (accuracy == AccuracyLevel::High && strength_level >= STRONG_STRENGTH)
        .then(|| TimeWindow {
            start: date.checked_sub_days(WINDOW_HALF_WIDTH).unwrap_or(NaiveDate::MIN),
            end: date.checked_add_days(WINDOW_HALF_WIDTH).unwrap_or(NaiveDate::MAX),
        });

    let method_summary = bucket
        .contributions
        .iter()
        .map(|c| c.method.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    ScoredResult {
        date,
        days_from_base: days_between(base_date, date, profile.exclude_weekends),
        convergence_count: bucket.contributions.len(),
        method_summary,
        methods: bucket.contributions,
        strength_level,
        total_strength: bucket.total_strength,
        time_window,
    }
}
