//! Display-side helpers shared by the CLI and the API. Nothing here changes a score.

pub mod csv;
pub mod view;

pub use view::{
    analysis_notes, chart_bars, day_unit_label, sorted, ChartBar, Recommendation, SortMode,
    StrengthFilter, Summary, ViewState, CHART_LIMIT,
};
