use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use goldwatch_market_data::aggregate::{self, HealthResponse};

use crate::main_lib::AppState;

/// Liveness check. Does not call any upstream source.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(aggregate::health(state.cache_ttl))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}
