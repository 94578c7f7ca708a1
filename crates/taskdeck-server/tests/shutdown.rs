//! Drain window between the stop signal and listener shutdown.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use tokio::sync::oneshot;

use taskdeck_server::{config::AppConfig, router, shutdown};

use common::{send, test_state};

#[tokio::test(start_paused = true)]
async fn readyz_reports_draining_before_shutdown_completes() {
    let mut cfg = AppConfig::default();
    cfg.server.shutdown_grace_ms = 5000;
    let (state, _metrics) = test_state(cfg);
    let app = router::build_router(state.clone());

    let (tx, rx) = oneshot::channel::<()>();
    let drain = tokio::spawn(shutdown::drain_after(state.clone(), async move {
        let _ = rx.await;
    }));

    tokio::task::yield_now().await;
    assert_eq!(send(&app, "GET", "/readyz", None).await.0, StatusCode::OK);
    assert!(!drain.is_finished());

    let signalled_at = tokio::time::Instant::now();
    tx.send(()).unwrap();
    while !state.is_draining() {
        tokio::task::yield_now().await;
    }

    let (status, body) = send(&app, "GET", "/readyz", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "draining");
    assert!(!drain.is_finished());

    drain.await.unwrap();
    assert!(signalled_at.elapsed() >= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn zero_grace_stops_right_after_signal() {
    let mut cfg = AppConfig::default();
    cfg.server.shutdown_grace_ms = 0;
    let (state, _metrics) = test_state(cfg);

    shutdown::drain_after(state.clone(), async {}).await;
    assert!(state.is_draining());
}
