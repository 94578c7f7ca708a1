//! Request timing middleware.
//!
//! Every request gets a [`RequestTimer`] before dispatch. The timer rides
//! along inside the response body and is consumed by
//! [`RequestTimer::finish`] when the body reports end-of-stream, which
//! records exactly one observation. If the request future or the body is
//! dropped first (client went away mid-request or mid-write), the timer is
//! dropped unfinished and nothing is recorded.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use http_body::{Frame, SizeHint};

use crate::app_state::AppState;
use crate::config::UnmatchedRoute;
use crate::obs::metrics::{AppMetrics, RequestLabels};

/// Route label used for requests that matched no route pattern.
pub const UNMATCHED_ROUTE_LABEL: &str = "unmatched";

/// Completion hook for one request.
pub struct RequestTimer {
    metrics: Arc<AppMetrics>,
    method: String,
    route: String,
    start: Instant,
    finished: bool,
}

impl RequestTimer {
    pub fn start(metrics: Arc<AppMetrics>, method: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            metrics,
            method: method.into(),
            route: route.into(),
            start: Instant::now(),
            finished: false,
        }
    }

    /// Record the observation. Returns the elapsed milliseconds.
    pub fn finish(mut self, status: StatusCode) -> f64 {
        self.finished = true;
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        self.metrics.observe_request(
            RequestLabels {
                method: &self.method,
                route: &self.route,
                status_code: status.as_u16(),
            },
            elapsed_ms,
        );
        elapsed_ms
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                method = %self.method,
                route = %self.route,
                "request aborted before completion; no observation recorded"
            );
        }
    }
}

/// Pick the route label for a request.
pub fn route_label(matched: Option<&MatchedPath>, raw_path: &str, mode: UnmatchedRoute) -> String {
    match (matched, mode) {
        (Some(mp), _) => mp.as_str().to_string(),
        (None, UnmatchedRoute::Raw) => raw_path.to_string(),
        (None, UnmatchedRoute::Fixed) => UNMATCHED_ROUTE_LABEL.to_string(),
    }
}

/// Response body that finishes its request timer at end-of-stream.
pub struct TimedBody {
    inner: Body,
    status: StatusCode,
    timer: Option<RequestTimer>,
}

impl TimedBody {
    pub fn new(inner: Body, status: StatusCode, timer: RequestTimer) -> Self {
        Self { inner, status, timer: Some(timer) }
    }

    fn complete(&mut self) {
        if let Some(timer) = self.timer.take() {
            let elapsed_ms = timer.finish(self.status);
            tracing::trace!(status = self.status.as_u16(), elapsed_ms, "request observed");
        }
    }
}

impl HttpBody for TimedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(None) => this.complete(),
            // hyper stops polling once `is_end_stream` turns true.
            Poll::Ready(Some(Ok(_))) if this.inner.is_end_stream() => this.complete(),
            _ => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Axum middleware recording `http_request_duration_ms{method, route, status_code}`.
///
/// Must be installed with `Router::layer` after all routes are added so that
/// `MatchedPath` is present in request extensions.
pub async fn track_request_duration(
    State(app): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let route = route_label(
        request.extensions().get::<MatchedPath>(),
        request.uri().path(),
        app.cfg().metrics.unmatched_route,
    );
    let timer = RequestTimer::start(app.metrics(), request.method().as_str(), route);

    let response = next.run(request).await;

    let status = response.status();
    let (parts, body) = response.into_parts();
    let mut body = TimedBody::new(body, status, timer);
    // An empty body is never polled; the head alone finalizes the response.
    if body.is_end_stream() {
        body.complete();
    }

    Response::from_parts(parts, Body::new(body))
}
