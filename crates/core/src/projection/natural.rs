use super::{hit, Anchor};
use crate::domain::asset::AssetProfile;
use crate::domain::method::Method;
use crate::domain::projection::RawHit;

/// Week, half month, month, season, half year.
const CYCLES: [u32; 5] = [7, 14, 28, 91, 182];

pub fn project(anchor: &Anchor, profile: &AssetProfile) -> Vec<RawHit> {
    CYCLES
        .into_iter()
        .filter(|days| *days <= anchor.horizon_days)
        .filter_map(|days| {
            hit(
                anchor,
                days,
                profile.exclude_weekends,
                Method::Natural,
                format!("cycle {days} days"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::AssetClass;
    use crate::projection::test_support::{anchor, offsets, profile};
    use crate::time::calendar::is_weekend;

    #[test]
    fn horizon_boundary_is_inclusive() {
        let crypto = profile(AssetClass::Crypto);
        assert_eq!(offsets(&project(&anchor(1.0, 182), &crypto)), vec![7, 14, 28, 91, 182]);
        assert_eq!(offsets(&project(&anchor(1.0, 181), &crypto)), vec![7, 14, 28, 91]);
    }

    #[test]
    fn weekend_excluding_profile_lands_on_weekdays() {
        let hits = project(&anchor(1.0, 365), &profile(AssetClass::Indices));
        assert!(hits.iter().all(|h| !is_weekend(h.date)));
        // Seven business days after Tuesday 2021-05-25 is Thursday 2021-06-03.
        assert_eq!(hits[0].date, chrono::NaiveDate::from_ymd_opt(2021, 6, 3).unwrap());
    }

    #[test]
    fn dates_past_calendar_end_are_dropped() {
        let near_end = Anchor {
            base_date: chrono::NaiveDate::MAX - chrono::Duration::days(10),
            ..anchor(1.0, 182)
        };
        assert_eq!(offsets(&project(&near_end, &profile(AssetClass::Crypto))), vec![7]);
    }
}
