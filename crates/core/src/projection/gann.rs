use super::{hit, round_offset, Anchor};
use crate::domain::asset::AssetProfile;
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

const ANGLES: [u32; 8] = [45, 90, 135, 180, 225, 270, 315, 360];

/// Time offsets from the square root of the scaled price, one per Gann angle.
pub fn project(anchor: &Anchor, profile: &AssetProfile) -> Vec<RawHit> {
    let root = (anchor.base_price * profile.scale_factor).sqrt();
    let divisor = f64::from(profile.gann_divisor.max(1));

    ANGLES
        .into_iter()
        .filter_map(|angle| {
            let offset = round_offset(root * f64::from(angle) / divisor);
            if offset == 0 || offset > anchor.horizon_days {
                return None;
            }
            hit(
                anchor,
                offset,
                profile.exclude_weekends,
                Method::Gann,
                format!("angle {angle}°"),
            )
        })
        .collect()
}
