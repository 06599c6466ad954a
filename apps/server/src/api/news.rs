use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use goldwatch_market_data::aggregate::{self, HeadlinesResponse, NewsResponse};
use goldwatch_market_data::NewsFeed;

use crate::main_lib::AppState;

// Failures are reported in the body with `success: false`; the status stays 200.

async fn get_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(aggregate::news(&state.feeds, NewsFeed::General).await)
}

async fn get_macro_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(aggregate::news(&state.feeds, NewsFeed::Macro).await)
}

async fn get_inflation_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(aggregate::news(&state.feeds, NewsFeed::Inflation).await)
}

async fn get_gold_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(aggregate::news(&state.feeds, NewsFeed::Gold).await)
}

async fn get_headlines(State(state): State<Arc<AppState>>) -> Json<HeadlinesResponse> {
    Json(aggregate::headlines(&state.feeds).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(get_news))
        .route("/macro-news", get(get_macro_news))
        .route("/news/inflation", get(get_inflation_news))
        .route("/news/gold", get(get_gold_news))
        .route("/news/headlines", get(get_headlines))
}
