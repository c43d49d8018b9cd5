use crate::domain::projection::ProjectionSet;
use crate::report::view::{sorted, Recommendation, SortMode, Summary};
use anyhow::Context;
use chrono::NaiveDate;
use std::fmt::Write;

const BOM: &str = "\u{FEFF}";
const HEADER: [&str; 7] = [
    "date",
    "days-from-base",
    "strength",
    "convergences",
    "methods",
    "recommendation",
    "time-window",
];
const EXACT_DATE: &str = "exact date";

pub fn export_file_name(today: NaiveDate) -> String {
    format!("gann_dates_{}.csv", today.format("%Y-%m-%d"))
}

/// Renders every result of `set` in `sort` order, followed by a run summary block.
pub fn export_csv(set: &ProjectionSet, sort: SortMode) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(BOM.as_bytes().to_vec());
    writer.write_record(HEADER)?;

    for r in sorted(set, sort) {
        let recommendation = Recommendation::for_strength(r.strength_level);
        let window = r
            .time_window
            .map(|w| w.to_string())
            .unwrap_or_else(|| EXACT_DATE.to_string());

        writer.write_record([
            r.formatted_date(),
            r.days_from_base.to_string(),
            r.strength_level.to_string(),
            r.convergence_count.to_string(),
            r.method_summary.clone(),
            recommendation.text().to_string(),
            window,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV rows: {}", e.error()))?;
    let mut out = String::from_utf8(bytes).context("CSV rows are not UTF-8")?;

    let summary = Summary::of(set);
    let _ = write!(
        out,
        "\n\nSummary:\n\
         Asset: {}\n\
         Base price: {}\n\
         Base date: {}\n\
         Accuracy level: {}\n\
         Total dates: {}\n\
         Strong dates (4+ stars): {}\n\
         Critical dates (5 stars): {}\n",
        set.profile.name,
        set.input.base_price_text,
        set.input.base_date.format("%Y-%m-%d"),
        set.input.accuracy.key(),
        summary.total,
        summary.strong,
        summary.critical,
    );
    Ok(out)
}
