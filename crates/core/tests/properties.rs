use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeSet;
use turnpoint_core::domain::asset::{AssetClass, AssetRegistry};
use turnpoint_core::domain::method::Method;
use turnpoint_core::domain::contract::{ProjectionRequest, RawNumber};
use turnpoint_core::domain::projection::{AccuracyLevel, ProjectionInput, MAX_HORIZON_DAYS};
use turnpoint_core::engine;
use turnpoint_core::error::InputError;
use turnpoint_core::projection::{self, Anchor};
use turnpoint_core::time::calendar::{add_days, days_between, is_weekend};

fn base_date(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(i64::from(offset))
}

fn methods_from_mask(mask: u8) -> BTreeSet<Method> {
    Method::ALL
        .into_iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, m)| m)
        .collect()
}

fn input(
    price: f64,
    date_offset: u32,
    horizon_days: u32,
    asset_idx: usize,
    mask: u8,
    high: bool,
) -> ProjectionInput {
    ProjectionInput {
        base_price: price,
        base_price_text: price.to_string(),
        base_date: base_date(date_offset),
        horizon_days,
        asset_class: AssetClass::ALL[asset_idx],
        methods: methods_from_mask(mask),
        accuracy: if high { AccuracyLevel::High } else { AccuracyLevel::Standard },
    }
}

proptest! {
    /// Property: every scored date lies strictly after the base date.
    #[test]
    fn prop_results_are_in_the_future(
        price in 0.01f64..100_000.0,
        date_offset in 0u32..15_000,
        horizon in 1u32..400,
        asset_idx in 0usize..6,
        mask in 1u8..64,
    ) {
        let registry = AssetRegistry::builtin();
        let input = input(price, date_offset, horizon, asset_idx, mask, false);
        let profile = registry.get(input.asset_class).unwrap();
        let set = engine::run(input, profile);
        for r in &set.results {
            prop_assert!(r.date > set.input.base_date);
            prop_assert!((1..=5).contains(&r.strength_level));
            prop_assert_eq!(r.convergence_count, r.methods.len());
        }
    }

    /// Property: weekend-excluding profiles resolve weekend-sensitive methods to weekdays.
    #[test]
    fn prop_weekend_exclusion_yields_weekdays(
        price in 0.01f64..100_000.0,
        date_offset in 0u32..15_000,
        horizon in 1u32..400,
    ) {
        let registry = AssetRegistry::builtin();
        let anchor = Anchor { base_price: price, base_date: base_date(date_offset), horizon_days: horizon };
        for class in AssetClass::ALL {
            let profile = registry.get(class).unwrap();
            if !profile.exclude_weekends {
                continue;
            }
            for method in [Method::Gann, Method::Fibonacci, Method::Gematria, Method::Natural] {
                for hit in projection::project(method, &anchor, profile) {
                    prop_assert!(!is_weekend(hit.date), "{:?} {:?} landed on {}", class, method, hit.date);
                }
            }
        }
    }

    /// Property: identical inputs give identical result sets.
    #[test]
    fn prop_runs_are_idempotent(
        price in 0.01f64..100_000.0,
        date_offset in 0u32..15_000,
        horizon in 1u32..400,
        asset_idx in 0usize..6,
        mask in 1u8..64,
        high in any::<bool>(),
    ) {
        let registry = AssetRegistry::builtin();
        let a = input(price, date_offset, horizon, asset_idx, mask, high);
        let profile = registry.get(a.asset_class).unwrap();
        let first = engine::run(a.clone(), profile);
        let second = engine::run(a, profile);
        prop_assert_eq!(first.results, second.results);
    }

    /// Property: adding a method never lowers the strength of a date already present.
    #[test]
    fn prop_adding_a_method_never_lowers_strength(
        price in 0.01f64..100_000.0,
        date_offset in 0u32..15_000,
        horizon in 1u32..400,
        asset_idx in 0usize..6,
        mask in 1u8..64,
        extra in 0usize..6,
    ) {
        let registry = AssetRegistry::builtin();
        let base = input(price, date_offset, horizon, asset_idx, mask, false);
        let mut wider = base.clone();
        wider.methods.insert(Method::ALL[extra]);

        let profile = registry.get(base.asset_class).unwrap();
        let narrow_set = engine::run(base, profile);
        let wide_set = engine::run(wider, profile);

        for r in &narrow_set.results {
            let w = wide_set.results.iter().find(|w| w.date == r.date);
            prop_assert!(w.is_some());
            let w = w.unwrap();
            prop_assert!(w.strength_level >= r.strength_level);
            prop_assert!(w.total_strength >= r.total_strength - 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: any horizon either validates and runs or is rejected as an invalid horizon.
    #[test]
    fn prop_large_horizons_run_or_are_rejected(
        price in 0.01f64..1e15,
        horizon in 1u32..1_000_000,
        asset_idx in 0usize..6,
    ) {
        let request = ProjectionRequest {
            base_price: Some(RawNumber::Number(price)),
            base_date: Some("2021-05-25".to_string()),
            horizon_days: Some(RawNumber::Number(f64::from(horizon))),
            asset_class: Some(AssetClass::ALL[asset_idx].key().to_string()),
            methods: None,
            accuracy: Some("high".to_string()),
        };
        match engine::calculate(request, &AssetRegistry::builtin()) {
            Ok(set) => {
                prop_assert!(horizon <= MAX_HORIZON_DAYS);
                prop_assert!(set.results.iter().all(|r| r.date > set.input.base_date));
            }
            Err(err) => {
                prop_assert!(horizon > MAX_HORIZON_DAYS);
                prop_assert!(matches!(
                    err.downcast_ref::<InputError>(),
                    Some(InputError::InvalidHorizon(_))
                ));
            }
        }
    }

    /// Property: runs anchored near the end of the calendar complete and stay in the future.
    #[test]
    fn prop_runs_near_calendar_end_complete(
        price in 0.01f64..1e15,
        days_before_end in 0i64..60_000,
        horizon in 1u32..=MAX_HORIZON_DAYS,
        asset_idx in 0usize..6,
        mask in 1u8..64,
    ) {
        let registry = AssetRegistry::builtin();
        let mut input = input(price, 0, horizon, asset_idx, mask, true);
        input.base_date = NaiveDate::MAX - Duration::days(days_before_end);
        let profile = registry.get(input.asset_class).unwrap();
        let set = engine::run(input, profile);
        for r in &set.results {
            prop_assert!(r.date > set.input.base_date);
        }
    }

    /// Property: closed-form day arithmetic agrees with walking the calendar one day at a time.
    #[test]
    fn prop_add_days_matches_day_by_day_walk(
        date_offset in 0u32..15_000,
        n in 0u32..3_000,
        exclude in any::<bool>(),
    ) {
        let start = base_date(date_offset);
        let mut walked = start;
        let mut counted = 0;
        while counted < n {
            walked = walked.succ_opt().unwrap();
            if !exclude || !is_weekend(walked) {
                counted += 1;
            }
        }
        prop_assert_eq!(add_days(start, n, exclude), Some(walked));
        prop_assert_eq!(days_between(start, walked, exclude), n);
    }
}

#[test]
fn fixed_offsets_are_included_at_exact_horizon() {
    let registry = AssetRegistry::builtin();
    let profile = registry.get(AssetClass::Crypto).unwrap();
    for (method, offset) in [(Method::Fibonacci, 34), (Method::Natural, 91)] {
        let at = Anchor { base_price: 1.0, base_date: base_date(0), horizon_days: offset };
        let below = Anchor { horizon_days: offset - 1, ..at };
        assert!(projection::project(method, &at, profile)
            .iter()
            .any(|h| h.days_from_base == offset));
        assert!(projection::project(method, &below, profile)
            .iter()
            .all(|h| h.days_from_base != offset));
    }
}
