pub mod cache;
pub mod config;
pub mod directions;
pub mod error;
pub mod polyline;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use shared::{DirectionsResult, MapsConfig, RouteQuery};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::directions::DirectionsProvider;
use crate::error::RouteError;

pub struct AppState<P> {
    pub provider: Arc<P>,
    pub maps: Arc<MapsConfig>,
}

impl<P> AppState<P> {
    pub fn new(provider: P, maps: MapsConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            maps: Arc::new(maps),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            maps: Arc::clone(&self.maps),
        }
    }
}

pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: DirectionsProvider + 'static,
{
    Router::new()
        .route("/api/route", post(route_handler::<P>))
        .route("/api/config", get(config_handler::<P>))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn route_handler<P>(
    State(state): State<AppState<P>>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<DirectionsResult>, RouteError>
where
    P: DirectionsProvider + 'static,
{
    query.validate()?;
    let result = state.provider.compute_route(&query).await?;
    tracing::info!(
        origin = %query.origin,
        destination = %query.destination,
        routes = result.routes.len(),
        "route computed"
    );
    Ok(Json(result))
}

async fn config_handler<P>(State(state): State<AppState<P>>) -> Json<MapsConfig>
where
    P: DirectionsProvider + 'static,
{
    Json(MapsConfig::clone(&state.maps))
}
