use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use goldwatch_market_data::testing::{gold_silver_spot, MockIndices, MockMetals, MockNews};
use goldwatch_market_data::{CacheStore, MarketFeeds};
use goldwatch_server::{
    api::{app_router, spa_service},
    config::Config,
    AppState,
};
use rust_decimal_macros::dec;
use tempfile::tempdir;
use tower::ServiceExt;

fn production_router(static_dir: &std::path::Path) -> axum::Router {
    let dir = static_dir.to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "NODE_ENV" => Some("production".to_string()),
        "STATIC_DIR" => Some(dir.clone()),
        _ => None,
    })
    .unwrap();
    assert!(config.serve_static);

    let feeds = MarketFeeds::new(
        Arc::new(CacheStore::default()),
        Arc::new(MockMetals::new(gold_silver_spot(dec!(2000), dec!(25)))),
        Arc::new(MockIndices::default()),
        Arc::new(MockNews::default()),
    );
    let state = Arc::new(AppState::new(feeds, Duration::from_secs(30)));
    app_router(state, &config).fallback_service(spa_service(&config.static_dir))
}

#[tokio::test]
async fn serves_index_html_for_unknown_route() {
    let static_dir = tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>SPA</html>").unwrap();
    let app = production_router(static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "<html>SPA</html>".as_bytes());
}

#[tokio::test]
async fn serves_bundle_assets() {
    let static_dir = tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>SPA</html>").unwrap();
    std::fs::write(static_dir.path().join("app.js"), "console.log('gold')").unwrap();
    let app = production_router(static_dir.path());

    let response = app
        .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "console.log('gold')".as_bytes());
}

#[tokio::test]
async fn unknown_api_route_is_not_the_bundle() {
    let static_dir = tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>SPA</html>").unwrap();
    let app = production_router(static_dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/portfolio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], 404);
}
