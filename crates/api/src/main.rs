use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use turnpoint_core::domain::asset::{AssetProfile, AssetRegistry};
use turnpoint_core::domain::contract::ProjectionRequest;
use turnpoint_core::domain::projection::{ProjectionInput, ProjectionSet, ScoredResult};
use turnpoint_core::error::InputError;
use turnpoint_core::report::{Summary, ViewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = turnpoint_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let registry = match settings.load_registry() {
        Ok(r) => r,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "asset profile overrides rejected");
            return Err(e);
        }
    };

    let state = AppState {
        registry: Arc::new(registry),
    };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/profiles", get(get_profiles))
        .route("/projections", post(post_projection))
        .route("/projections/export", post(post_projection_export))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    registry: Arc<AssetRegistry>,
}

/// Calculation request plus the caller's display preferences.
#[derive(Debug, Deserialize)]
struct ProjectionQuery {
    #[serde(flatten)]
    request: ProjectionRequest,
    #[serde(flatten)]
    view: ViewState,
}

#[derive(Debug, Serialize)]
struct ApiProjection {
    run_id: Uuid,
    input: ProjectionInput,
    profile: AssetProfile,
    summary: Summary,
    results: Vec<ScoredResult>,
}

async fn get_profiles(State(state): State<AppState>) -> Json<AssetRegistry> {
    Json(state.registry.as_ref().clone())
}

async fn post_projection(
    State(state): State<AppState>,
    Json(query): Json<ProjectionQuery>,
) -> Result<Json<ApiProjection>, (StatusCode, String)> {
    let run_id = Uuid::new_v4();
    let set = calculate(&state, query.request, run_id).await?;

    let results = query.view.apply(&set).into_iter().cloned().collect();
    Ok(Json(ApiProjection {
        run_id,
        summary: Summary::of(&set),
        input: set.input,
        profile: set.profile,
        results,
    }))
}

async fn post_projection_export(
    State(state): State<AppState>,
    Json(query): Json<ProjectionQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let run_id = Uuid::new_v4();
    let set = calculate(&state, query.request, run_id).await?;

    let csv = turnpoint_core::report::csv::export_csv(&set, query.view.sort)
        .map_err(|e| map_error(run_id, e))?;
    let file_name =
        turnpoint_core::report::csv::export_file_name(chrono::Utc::now().date_naive());
    tracing::info!(%run_id, rows = set.results.len(), %file_name, "exported CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    ))
}

/// Runs the engine off the async workers; the previous result set of the caller is untouched on
/// rejection.
async fn calculate(
    state: &AppState,
    request: ProjectionRequest,
    run_id: Uuid,
) -> Result<ProjectionSet, (StatusCode, String)> {
    let registry = Arc::clone(&state.registry);
    let res = tokio::task::spawn_blocking(move || {
        turnpoint_core::engine::calculate(request, &registry)
    })
    .await
    .map_err(|e| {
        let err = anyhow::Error::new(e);
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(%run_id, error = %err, "projection task failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "projection failed".to_string())
    })?;

    res.map_err(|e| map_error(run_id, e))
}

fn map_error(run_id: Uuid, err: anyhow::Error) -> (StatusCode, String) {
    if let Some(input_err) = err.downcast_ref::<InputError>() {
        tracing::info!(%run_id, error = %input_err, "projection input rejected");
        return (StatusCode::BAD_REQUEST, input_err.to_string());
    }
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(%run_id, error = %err, "projection failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "projection failed".to_string())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &turnpoint_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use turnpoint_core::report::{SortMode, StrengthFilter};

    fn state() -> AppState {
        AppState {
            registry: Arc::new(AssetRegistry::builtin()),
        }
    }

    fn query(v: serde_json::Value) -> ProjectionQuery {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn query_carries_request_and_view() {
        let q = query(json!({
            "base_price": 1850.5,
            "base_date": "2021-05-25",
            "horizon_days": 180,
            "asset_class": "forex",
            "methods": ["gann", "fibonacci"],
            "sort": "date",
            "filter": "strong"
        }));
        assert_eq!(q.view.sort, SortMode::Date);
        assert_eq!(q.view.filter, StrengthFilter::Strong);
        let input = q.request.validate_and_into_input().unwrap();
        assert_eq!(input.horizon_days, 180);
    }

    #[test]
    fn view_defaults_when_absent() {
        let q = query(json!({"base_price": 10, "base_date": "2026-01-02", "horizon_days": 30}));
        assert_eq!(q.view, ViewState::default());
    }

    #[tokio::test]
    async fn projection_returns_sorted_results() {
        let q = query(json!({
            "base_price": "1850.50",
            "base_date": "2021-05-25",
            "horizon_days": 180,
            "asset_class": "forex",
            "accuracy": "high"
        }));
        let Json(body) = post_projection(State(state()), Json(q)).await.unwrap();
        assert_eq!(body.summary.total, body.results.len());
        for pair in body.results.windows(2) {
            assert!(pair[0].strength_level >= pair[1].strength_level);
        }
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request() {
        let q = query(json!({"base_date": "2021-05-25", "horizon_days": 180}));
        let (status, msg) = post_projection(State(state()), Json(q)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "base price is required");
    }

    #[tokio::test]
    async fn oversized_horizon_is_bad_request() {
        let q = query(json!({
            "base_price": 1e15,
            "base_date": "2021-05-25",
            "horizon_days": 400_000_000,
            "asset_class": "crypto",
            "methods": ["gann"]
        }));
        let (status, msg) = post_projection(State(state()), Json(q)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(msg.starts_with("horizon days must be a whole number"));
    }

    #[tokio::test]
    async fn export_rejects_empty_method_selection() {
        let q = query(json!({
            "base_price": 100,
            "base_date": "2021-05-25",
            "horizon_days": 180,
            "methods": []
        }));
        let res = post_projection_export(State(state()), Json(q)).await;
        assert!(matches!(res, Err((StatusCode::BAD_REQUEST, _))));
    }
}
