use crate::convergence::{self, CRITICAL_STRENGTH, STRONG_STRENGTH};
use crate::domain::asset::{AssetProfile, AssetRegistry};
use crate::domain::contract::ProjectionRequest;
use crate::domain::projection::{ProjectionInput, ProjectionSet, RawHit};
use crate::error::InputError;
use crate::projection::{self, Anchor};

/// Validates `request`, resolves its asset profile and runs the calculation.
///
/// Rejected input surfaces as an [`InputError`] inside the returned `anyhow::Error`; callers that
/// need to tell it apart use `downcast_ref::<InputError>()`.
pub fn calculate(
    request: ProjectionRequest,
    registry: &AssetRegistry,
) -> anyhow::Result<ProjectionSet> {
    let input = request.validate_and_into_input()?;
    let profile = registry
        .get(input.asset_class)
        .ok_or_else(|| InputError::UnknownAssetClass(input.asset_class.to_string()))?;
    Ok(run(input, profile))
}

/// Runs every selected projector and aggregates their hits. Cannot fail on validated input.
pub fn run(input: ProjectionInput, profile: &AssetProfile) -> ProjectionSet {
    let anchor = Anchor {
        base_price: input.base_price,
        base_date: input.base_date,
        horizon_days: input.horizon_days,
    };

    let mut hits: Vec<RawHit> = Vec::new();
    for method in &input.methods {
        let method_hits = projection::project(*method, &anchor, profile);
        tracing::debug!(
            method = method.key(),
            hits = method_hits.len(),
            "projection method finished"
        );
        hits.extend(method_hits);
    }

    let raw_hits = hits.len();
    let results = convergence::aggregate(hits, input.base_date, profile, input.accuracy);

    tracing::info!(
        asset = %input.asset_class,
        base_date = %input.base_date,
        horizon_days = input.horizon_days,
        methods = input.methods.len(),
        raw_hits,
        results = results.len(),
        strong = results.iter().filter(|r| r.strength_level >= STRONG_STRENGTH).count(),
        critical = results.iter().filter(|r| r.strength_level >= CRITICAL_STRENGTH).count(),
        "projection run complete"
    );

    ProjectionSet {
        input,
        profile: profile.clone(),
        results,
    }
}
