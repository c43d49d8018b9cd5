use std::fmt::Write;
use turnpoint_core::domain::asset::AssetRegistry;
use turnpoint_core::domain::projection::{ProjectionSet, DISPLAY_DATE_FORMAT};
use turnpoint_core::report::{
    analysis_notes, chart_bars, day_unit_label, sorted, Summary, ViewState, CHART_LIMIT,
};

const CHART_WIDTH: usize = 30;

pub fn profiles(registry: &AssetRegistry) -> String {
    let mut out = String::new();
    for (class, profile) in registry.iter() {
        let _ = writeln!(
            out,
            "{:<12} {:<12} scale={:<8} divisor={:<4} weekends={}",
            class.key(),
            profile.name,
            profile.scale_factor,
            profile.gann_divisor,
            if profile.exclude_weekends {
                "excluded (markets closed on weekends)"
            } else {
                "counted (trades 24/7)"
            }
        );
        let weights = profile
            .weights
            .iter()
            .map(|(m, w)| format!("{}={w}", m.key()))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "             weights: {weights}");
    }
    out
}

pub fn report(set: &ProjectionSet, view: ViewState) -> String {
    let mut out = String::new();
    let summary = Summary::of(set);

    let _ = writeln!(
        out,
        "{} | base {} on {} | horizon {} days | accuracy {}",
        set.profile.name,
        set.input.base_price_text,
        set.input.base_date,
        set.input.horizon_days,
        set.input.accuracy.key()
    );

    if set.results.is_empty() {
        let _ = writeln!(out, "\nNo future dates found for this selection.");
        return out;
    }

    let _ = writeln!(
        out,
        "future dates: {} | strong: {} | critical: {} | average strength: {:.1}",
        summary.total, summary.strong, summary.critical, summary.average_strength
    );
    let _ = writeln!(
        out,
        "calculation period: {} - {}\n",
        summary.period_start.format(DISPLAY_DATE_FORMAT),
        summary.period_end.format(DISPLAY_DATE_FORMAT)
    );

    let shown = view.apply(set);
    if shown.is_empty() {
        let _ = writeln!(out, "No results match the selected filter.");
    }
    let unit = day_unit_label(&set.profile);
    for (idx, r) in shown.iter().enumerate() {
        let _ = writeln!(
            out,
            "#{:<3} {}  {:<5} ({} convergences)  {}",
            idx + 1,
            r.formatted_date(),
            "*".repeat(usize::from(r.strength_level)),
            r.convergence_count,
            r.method_summary
        );
        let _ = writeln!(out, "      +{} {unit} from base", r.days_from_base);
        if let Some(window) = r.time_window {
            let _ = writeln!(out, "      {window}");
        }
    }

    let ordered = sorted(set, view.sort);
    let _ = writeln!(out, "\nStrength of the first {CHART_LIMIT} dates:");
    for bar in chart_bars(&ordered, CHART_LIMIT) {
        let len = ((bar.height_ratio * CHART_WIDTH as f64).round() as usize).max(1);
        let _ = writeln!(
            out,
            "  {} {:<width$} {}",
            bar.label,
            "#".repeat(len),
            bar.strength_level,
            width = CHART_WIDTH
        );
    }

    let _ = writeln!(out, "\nAnalysis:");
    for note in analysis_notes(set, &ordered) {
        let _ = writeln!(out, "  - {note}");
    }
    out
}
