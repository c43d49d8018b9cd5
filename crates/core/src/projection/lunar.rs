use super::{hit, round_offset, Anchor};
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

/// Mean synodic month in days.
pub const LUNAR_CYCLE_DAYS: f64 = 29.53;

/// Whole lunar cycles within the horizon, counted on the plain calendar.
pub fn project(anchor: &Anchor) -> Vec<RawHit> {
    let cycles = (f64::from(anchor.horizon_days) / LUNAR_CYCLE_DAYS).floor() as u32;
    (1..=cycles)
        .filter_map(|i| {
            let offset = round_offset(LUNAR_CYCLE_DAYS * f64::from(i));
            hit(anchor, offset, false, Method::Lunar, format!("cycle {i}"))
        })
        .collect()
}
