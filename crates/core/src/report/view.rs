use crate::convergence::{CRITICAL_STRENGTH, STRONG_STRENGTH};
use crate::domain::asset::AssetProfile;
use crate::domain::projection::{ProjectionSet, ScoredResult};
use crate::time::calendar::add_days;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const CHART_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Strength,
    Date,
}

impl SortMode {
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strength" => Some(Self::Strength),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthFilter {
    #[default]
    All,
    Strong,
    Critical,
}

impl StrengthFilter {
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "strong" => Some(Self::Strong),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn accepts(self, result: &ScoredResult) -> bool {
        match self {
            Self::All => true,
            Self::Strong => result.strength_level >= STRONG_STRENGTH,
            Self::Critical => result.strength_level >= CRITICAL_STRENGTH,
        }
    }
}

/// Caller-owned display state. Changing it never touches the result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub filter: StrengthFilter,
}

impl ViewState {
    pub fn apply<'a>(&self, set: &'a ProjectionSet) -> Vec<&'a ScoredResult> {
        let mut out: Vec<&ScoredResult> = set
            .results
            .iter()
            .filter(|r| self.filter.accepts(r))
            .collect();
        sort_results(&mut out, self.sort);
        out
    }
}

pub fn sort_results(results: &mut [&ScoredResult], mode: SortMode) {
    match mode {
        SortMode::Strength => results.sort_by(|a, b| {
            b.strength_level.cmp(&a.strength_level).then_with(|| {
                b.total_strength
                    .partial_cmp(&a.total_strength)
                    .unwrap_or(Ordering::Equal)
            })
        }),
        SortMode::Date => results.sort_by_key(|r| r.date),
    }
}

pub fn sorted(set: &ProjectionSet, mode: SortMode) -> Vec<&ScoredResult> {
    let mut out: Vec<&ScoredResult> = set.results.iter().collect();
    sort_results(&mut out, mode);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub strong: usize,
    pub critical: usize,
    /// Mean strength level rounded to one decimal.
    pub average_strength: f64,
    pub period_start: NaiveDate,
    /// Clamped to the last representable date.
    pub period_end: NaiveDate,
}

impl Summary {
    pub fn of(set: &ProjectionSet) -> Self {
        let total = set.results.len();
        let strong = count_at_least(&set.results, STRONG_STRENGTH);
        let critical = count_at_least(&set.results, CRITICAL_STRENGTH);
        let average_strength = if total == 0 {
            0.0
        } else {
            let sum: u32 = set.results.iter().map(|r| u32::from(r.strength_level)).sum();
            (f64::from(sum) / total as f64 * 10.0).round() / 10.0
        };

        Self {
            total,
            strong,
            critical,
            average_strength,
            period_start: set.input.base_date,
            period_end: add_days(set.input.base_date, set.input.horizon_days, false)
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

fn count_at_least(results: &[ScoredResult], level: u8) -> usize {
    results.iter().filter(|r| r.strength_level >= level).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Critical,
    Important,
    Secondary,
}

impl Recommendation {
    pub fn for_strength(level: u8) -> Self {
        if level >= CRITICAL_STRENGTH {
            Self::Critical
        } else if level >= STRONG_STRENGTH {
            Self::Important
        } else {
            Self::Secondary
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Critical => "Critical date! Very high probability of a turn",
            Self::Important => "Important date. Medium-high probability of a turn",
            Self::Secondary => "Secondary date. Monitor with caution",
        }
    }
}

/// Advisory notes for a run; `ordered` is the result list as currently sorted.
pub fn analysis_notes(set: &ProjectionSet, ordered: &[&ScoredResult]) -> Vec<String> {
    if set.results.is_empty() {
        return Vec::new();
    }

    let summary = Summary::of(set);
    let mut notes = Vec::new();
    if summary.critical > 0 {
        notes.push(format!(
            "{} critical dates identified - very high probability of a turn",
            summary.critical
        ));
    }
    if summary.strong > 0 {
        notes.push(format!("{} strong dates require monitoring", summary.strong));
    }
    if let Some(top) = ordered.first() {
        notes.push(format!(
            "Strongest date: {} ({} convergences)",
            top.formatted_date(),
            top.convergence_count
        ));
    }
    notes.push("Check these dates against your trading platform".to_string());
    notes.push("Confirm the direction with additional technical analysis".to_string());
    notes
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    /// Day and month, `DD.MM`.
    pub label: String,
    pub strength_level: u8,
    /// Bar height relative to the tallest bar, in `(0, 1]`.
    pub height_ratio: f64,
    pub recommendation: Recommendation,
}

/// Bars for the first `limit` results in display order.
pub fn chart_bars(ordered: &[&ScoredResult], limit: usize) -> Vec<ChartBar> {
    let shown = &ordered[..ordered.len().min(limit)];
    let max = shown.iter().map(|r| r.strength_level).max().unwrap_or(1).max(1);
    shown
        .iter()
        .map(|r| ChartBar {
            label: r.date.format("%d.%m").to_string(),
            strength_level: r.strength_level,
            height_ratio: f64::from(r.strength_level) / f64::from(max),
            recommendation: Recommendation::for_strength(r.strength_level),
        })
        .collect()
}

pub fn day_unit_label(profile: &AssetProfile) -> &'static str {
    if profile.exclude_weekends {
        "trading days"
    } else {
        "days"
    }
}
