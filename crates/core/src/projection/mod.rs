//! Independent date-projection heuristics.
//!
//! Every projector is a pure function of the anchor and the asset profile; none depends on
//! another, so they may run in any order.

pub mod astro;
pub mod fibonacci;
pub mod gann;
pub mod gematria;
pub mod lunar;
pub mod natural;

use crate::domain::asset::AssetProfile;
use crate::domain::method::Method;
use crate::domain::projection::RawHit;
use crate::time::calendar::add_days;
use chrono::NaiveDate;

/// Base values every projector derives its offsets from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub base_price: f64,
    pub base_date: NaiveDate,
    pub horizon_days: u32,
}

pub fn project(method: Method, anchor: &Anchor, profile: &AssetProfile) -> Vec<RawHit> {
    match method {
        Method::Gann => gann::project(anchor, profile),
        Method::Fibonacci => fibonacci::project(anchor, profile),
        Method::Lunar => lunar::project(anchor),
        Method::Astro => astro::project(anchor),
        Method::Gematria => gematria::project(anchor, profile),
        Method::Natural => natural::project(anchor, profile),
    }
}

/// Builds a hit `offset` days out. `None` when the date falls past the end of the calendar.
fn hit(
    anchor: &Anchor,
    offset: u32,
    exclude_weekends: bool,
    method: Method,
    detail: String,
) -> Option<RawHit> {
    Some(RawHit {
        date: add_days(anchor.base_date, offset, exclude_weekends)?,
        days_from_base: offset,
        method,
        detail,
    })
}

/// Rounds a non-negative offset half away from zero.
fn round_offset(x: f64) -> u32 {
    x.round().max(0.0) as u32
}
