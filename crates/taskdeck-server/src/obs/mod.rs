//! In-process observability.
//!
//! Request latencies are aggregated into atomic histogram series by the
//! timing middleware and rendered by the `/metrics` handler in the
//! Prometheus text format.

pub mod metrics;
pub mod middleware;
pub mod process;

pub use metrics::{AppMetrics, HistogramVec, MetricsRegistry, RequestLabels, SeriesSnapshot};
pub use middleware::{track_request_duration, RequestTimer, TimedBody};
