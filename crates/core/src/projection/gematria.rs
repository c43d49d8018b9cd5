use super::{hit, Anchor};
use crate::domain::asset::AssetProfile;
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

const CYCLES: [u32; 4] = [7, 22, 32, 72];
const YEAR_DAYS: u32 = 365;

/// Prices outside this range are written in exponent form and have no digit sum.
const PLAIN_NOTATION: std::ops::Range<f64> = 1e-6..1e21;

/// Sum of the decimal digits of `price` as it is written, ignoring the decimal point.
///
/// `None` for magnitudes that only have an exponent rendering, which yield no gematria dates.
pub fn digit_sum(price: f64) -> Option<u32> {
    if price != 0.0 && !PLAIN_NOTATION.contains(&price.abs()) {
        return None;
    }
    Some(
        price
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .sum(),
    )
}

pub fn project(anchor: &Anchor, profile: &AssetProfile) -> Vec<RawHit> {
    let Some(sum) = digit_sum(anchor.base_price) else {
        return Vec::new();
    };
    CYCLES
        .into_iter()
        .filter_map(|cycle| {
            let offset = ((u64::from(sum) * u64::from(cycle)) % u64::from(YEAR_DAYS)) as u32;
            if offset == 0 || offset > anchor.horizon_days {
                return None;
            }
            hit(
                anchor,
                offset,
                profile.exclude_weekends,
                Method::Gematria,
                format!("{sum} × {cycle}"),
            )
        })
        .collect()
}
