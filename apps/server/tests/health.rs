use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use goldwatch_market_data::testing::{gold_silver_spot, MockIndices, MockMetals, MockNews};
use goldwatch_market_data::{CacheStore, MarketFeeds};
use goldwatch_server::{api::app_router, config::Config, AppState};
use rust_decimal_macros::dec;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_cache_ttl_without_upstream_calls() {
    let metals = Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25))));
    let indices = Arc::new(MockIndices::default());
    let news = Arc::new(MockNews::default());
    let feeds = MarketFeeds::new(
        Arc::new(CacheStore::default()),
        metals.clone(),
        indices.clone(),
        news.clone(),
    );
    let state = Arc::new(AppState::new(feeds, Duration::from_secs(45)));
    let config = Config::from_lookup(|_| None).unwrap();
    let app = app_router(state, &config);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["cacheTTL"], 45);
    assert!(json["timestamp"].is_string());

    assert_eq!(metals.calls(), 0);
    assert_eq!(indices.calls(), 0);
    assert_eq!(news.calls(), 0);
}
