use crate::domain::asset::{AssetClass, AssetProfile};
use crate::domain::method::Method;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Longest accepted projection horizon, one hundred years.
pub const MAX_HORIZON_DAYS: u32 = 36_525;

pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyLevel {
    #[default]
    Standard,
    High,
}

impl AccuracyLevel {
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::High => "high",
        }
    }
}

/// Validated inputs of one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub base_price: f64,
    /// The price as the caller wrote it. Shown in reports and exports.
    pub base_price_text: String,
    pub base_date: NaiveDate,
    pub horizon_days: u32,
    pub asset_class: AssetClass,
    pub methods: BTreeSet<Method>,
    pub accuracy: AccuracyLevel,
}

/// One candidate date produced by one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawHit {
    pub date: NaiveDate,
    /// Offset the method generated, before any weekend adjustment.
    pub days_from_base: u32,
    pub method: Method,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodContribution {
    pub method: Method,
    pub detail: String,
    pub weight: f64,
}

/// Inclusive calendar-day range around a high-strength date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window: {} - {}",
            self.start.format(DISPLAY_DATE_FORMAT),
            self.end.format(DISPLAY_DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub date: NaiveDate,
    pub days_from_base: u32,
    pub methods: Vec<MethodContribution>,
    pub method_summary: String,
    pub strength_level: u8,
    pub convergence_count: usize,
    pub total_strength: f64,
    pub time_window: Option<TimeWindow>,
}

impl ScoredResult {
    pub fn formatted_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// Complete output of one calculation run. Never updated in place; the next run replaces it.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionSet {
    pub input: ProjectionInput,
    pub profile: AssetProfile,
    pub results: Vec<ScoredResult>,
}
