use std::sync::Arc;

use axum::extract::{Path, State};
use axum::handler::Handler;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use tracing::{info, instrument};

use crate::catalog::TariffCatalog;
use crate::dto::{CountryDto, LeaderboardDto, StatusDto};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{cors_layer, log_requests, reject_bare_options};

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<dyn TariffCatalog>,
}

/// `/health` plus the `/api` group. CORS only runs on matched paths, so
/// unknown paths stay 404 even for preflights; the request logger wraps
/// everything.
pub fn build_router(state: Arc<ApiState>) -> Router {
    let api = Router::new()
        .route("/leaderboard", get_only(get_leaderboard))
        .route("/country/:code", get_only(get_country))
        .route("/refresh-tariffs", post(refresh_tariffs));

    Router::new()
        .route("/health", get_only(health))
        .nest("/api", api)
        .route_layer(cors_layer())
        .route_layer(middleware::from_fn(reject_bare_options))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// `get` without the implicit HEAD handling axum adds.
fn get_only<H, T>(handler: H) -> MethodRouter<Arc<ApiState>>
where
    H: Handler<T, Arc<ApiState>>,
    T: 'static,
{
    get(handler).head(method_not_allowed)
}

async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn health() -> Json<StatusDto> {
    Json(StatusDto::new("ok"))
}

#[instrument(skip(state))]
async fn get_leaderboard(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<Vec<LeaderboardDto>>> {
    let entries = state.catalog.leaderboard().await?;
    Ok(Json(entries.into_iter().map(LeaderboardDto::from).collect()))
}

#[instrument(skip(state))]
async fn get_country(
    State(state): State<Arc<ApiState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<CountryDto>> {
    let detail = state
        .catalog
        .country(&code)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("country {} not found", code)))?;
    Ok(Json(CountryDto::from(detail)))
}

// No updater is wired in yet; the endpoint only acknowledges the request.
async fn refresh_tariffs() -> Json<StatusDto> {
    info!("tariff refresh requested");
    Json(StatusDto::new("update started"))
}
