use super::{hit, round_offset, Anchor};
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

/// Conjunction, square, trine, opposition.
const ASPECTS: [u32; 4] = [0, 90, 120, 180];

/// Mean astrological month.
const PLANETARY_CYCLE_DAYS: f64 = 365.25 / 12.0;

pub fn project(anchor: &Anchor) -> Vec<RawHit> {
    ASPECTS
        .into_iter()
        .filter_map(|aspect| {
            let offset = round_offset(PLANETARY_CYCLE_DAYS * f64::from(aspect) / 30.0);
            if offset == 0 || offset > anchor.horizon_days {
                return None;
            }
            hit(anchor, offset, false, Method::Astro, format!("aspect {aspect}°"))
        })
        .collect()
}
