use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use goldwatch_market_data::aggregate::{self, PerformanceResponse};

use crate::main_lib::AppState;

async fn get_performance(State(state): State<Arc<AppState>>) -> Json<PerformanceResponse> {
    Json(aggregate::performance(&state.feeds).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/performance", get(get_performance))
}
