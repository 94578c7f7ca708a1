//! Shared helpers for driving the router in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use taskdeck_server::{
    app_state::AppState,
    config::AppConfig,
    obs::AppMetrics,
    router,
    store::MemoryStore,
};

pub fn test_state(cfg: AppConfig) -> (AppState, Arc<AppMetrics>) {
    let metrics = Arc::new(AppMetrics::new(cfg.metrics.default_metrics));
    let state = AppState::with_metrics(cfg, Arc::new(MemoryStore::new()), Arc::clone(&metrics));
    (state, metrics)
}

pub fn test_app() -> (Router, Arc<AppMetrics>) {
    let (state, metrics) = test_state(AppConfig::default());
    (router::build_router(state), metrics)
}

pub async fn send(app: &Router, method: &str, uri: &str, json: Option<&str>) -> (StatusCode, String) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match json {
        Some(s) => {
            req = req.header("content-type", "application/json");
            Body::from(s.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
