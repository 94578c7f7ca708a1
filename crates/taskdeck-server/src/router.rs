//! Axum router wiring.
//!
//! Task CRUD lives at the root, next to the ops endpoints. The timing
//! middleware wraps every route and the fallback, so 404s are observed too.

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().metrics.path.clone();

    Router::new()
        .route("/", get(api::tasks::list).post(api::tasks::create))
        .route("/:id", put(api::tasks::update).delete(api::tasks::delete))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route(&metrics_path, get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track_request_duration,
        ))
        .with_state(state)
}
