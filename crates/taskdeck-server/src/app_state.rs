//! Shared application state for the task server.
//!
//! The metrics registry and the store are constructed by the caller and
//! injected here, so tests can run against a fresh registry each time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::obs::AppMetrics;
use crate::store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<dyn TaskStore>,
    metrics: Arc<AppMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
    draining: AtomicBool,
}

impl AppState {
    /// Build state with a metrics registry derived from `cfg`.
    pub fn new(cfg: AppConfig, store: Arc<dyn TaskStore>) -> Self {
        let metrics = Arc::new(AppMetrics::new(cfg.metrics.default_metrics));
        Self::with_metrics(cfg, store, metrics)
    }

    pub fn with_metrics(cfg: AppConfig, store: Arc<dyn TaskStore>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                draining: AtomicBool::new(false),
            }),
            store,
            metrics,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<AppMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }

    /// Extra gauge lines appended to the metrics exposition.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("taskdeck_draining", u64::from(self.is_draining()))]
    }
}
