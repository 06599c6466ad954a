use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use goldwatch_market_data::aggregate::{self, PricesResponse};

use crate::main_lib::AppState;

/// Gold, silver and the two indices. Always 200; failed sources show up
/// as `null` slots plus a warning.
async fn get_prices(State(state): State<Arc<AppState>>) -> Json<PricesResponse> {
    Json(aggregate::prices(&state.feeds).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/prices", get(get_prices))
}
