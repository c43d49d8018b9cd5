use super::{hit, Anchor};
use crate::domain::asset::AssetProfile;
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

const SEQUENCE: [u32; 9] = [8, 13, 21, 34, 55, 89, 144, 233, 377];

pub fn project(anchor: &Anchor, profile: &AssetProfile) -> Vec<RawHit> {
    SEQUENCE
        .into_iter()
        .filter(|days| *days <= anchor.horizon_days)
        .filter_map(|days| {
            hit(
                anchor,
                days,
                profile.exclude_weekends,
                Method::Fibonacci,
                format!("cycle {days} days"),
            )
        })
        .collect()
}
