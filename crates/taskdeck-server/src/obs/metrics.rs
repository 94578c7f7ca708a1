//! Metrics registry for the task server.
//!
//! Histogram families with dynamic labels backed by `DashMap`. Each series
//! keeps one atomic counter per bucket plus a running count and sum, so
//! concurrent observers never lose increments and scrapes never block writers.
//! Label values are stored in the family's declared label order, which keeps
//! rendering deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::process::ProcessCollector;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Name of the request latency histogram.
pub const HTTP_REQUEST_DURATION_MS: &str = "http_request_duration_ms";

/// Latency buckets in milliseconds.
pub const HTTP_DURATION_BUCKETS_MS: [f64; 7] = [50.0, 100.0, 200.0, 300.0, 400.0, 500.0, 1000.0];

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// `f64` stored as raw bits; additions go through a CAS loop.
#[derive(Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn add(&self, v: f64) {
        let _ = self.0.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some((f64::from_bits(bits) + v).to_bits())
        });
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// One histogram instance for a single label tuple.
struct HistogramSeries {
    count: AtomicU64,
    sum: AtomicF64,
    buckets: Box<[AtomicU64]>,
}

impl HistogramSeries {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    // Writers bump count first, then buckets from the largest bound down.
    // Readers load buckets from the smallest bound up, then count, so every
    // snapshot stays cumulative even while observations are in flight.
    fn observe(&self, bounds: &[f64], value: f64) {
        self.count.fetch_add(1, Ordering::Release);
        self.sum.add(value);
        for (i, &le) in bounds.iter().enumerate().rev() {
            if value <= le {
                self.buckets[i].fetch_add(1, Ordering::Release);
            } else {
                break;
            }
        }
    }

    fn snapshot(&self, bounds: &[f64], labels: Vec<(String, String)>) -> SeriesSnapshot {
        let buckets = bounds
            .iter()
            .zip(self.buckets.iter())
            .map(|(&le, c)| (le, c.load(Ordering::Acquire)))
            .collect();
        let count = self.count.load(Ordering::Acquire);
        SeriesSnapshot {
            labels,
            buckets,
            sum: self.sum.load(),
            count,
        }
    }
}

/// Point-in-time copy of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    /// `(label name, label value)` in declared label order.
    pub labels: Vec<(String, String)>,
    /// `(upper bound, cumulative count)` in ascending bound order.
    pub buckets: Vec<(f64, u64)>,
    pub sum: f64,
    /// Total observations; this is the `+Inf` bucket.
    pub count: u64,
}

impl SeriesSnapshot {
    /// Cumulative count for the bucket with upper bound `le`.
    pub fn bucket(&self, le: f64) -> Option<u64> {
        self.buckets.iter().find(|(b, _)| *b == le).map(|(_, c)| *c)
    }
}

/// A histogram family: fixed name, help, label names and buckets, with one
/// series per distinct label tuple created on first observation.
pub struct HistogramVec {
    name: String,
    help: String,
    label_names: Vec<String>,
    bounds: Vec<f64>,
    map: DashMap<Vec<String>, HistogramSeries>,
}

impl HistogramVec {
    /// Bounds are sorted and deduplicated; non-finite bounds are dropped
    /// since `+Inf` is always implied.
    pub fn new(name: &str, help: &str, label_names: &[&str], buckets: &[f64]) -> Self {
        let mut bounds: Vec<f64> = buckets.iter().copied().filter(|b| b.is_finite()).collect();
        bounds.sort_by(f64::total_cmp);
        bounds.dedup();
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            bounds,
            map: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Observe a value for the given label values (in declared label order).
    ///
    /// The series is created lazily. A call with the wrong number of label
    /// values is a programming error; it is logged and dropped.
    pub fn observe(&self, label_values: &[&str], value: f64) {
        if label_values.len() != self.label_names.len() {
            tracing::warn!(
                metric = %self.name,
                expected = self.label_names.len(),
                got = label_values.len(),
                "histogram label arity mismatch; observation dropped"
            );
            return;
        }

        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        if let Some(series) = self.map.get(&key) {
            series.observe(&self.bounds, value);
            return;
        }
        let series = self
            .map
            .entry(key)
            .or_insert_with(|| HistogramSeries::new(self.bounds.len()));
        series.observe(&self.bounds, value);
    }

    /// Snapshot of one series, if it has been observed.
    pub fn get(&self, label_values: &[&str]) -> Option<SeriesSnapshot> {
        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        let series = self.map.get(&key)?;
        Some(series.snapshot(&self.bounds, self.pair_labels(&key)))
    }

    /// Snapshots of every series, sorted by label values.
    pub fn snapshot(&self) -> Vec<SeriesSnapshot> {
        let mut out: Vec<SeriesSnapshot> = self
            .map
            .iter()
            .map(|r| r.value().snapshot(&self.bounds, self.pair_labels(r.key())))
            .collect();
        out.sort_by(|a, b| a.labels.cmp(&b.labels));
        out
    }

    pub fn series_count(&self) -> usize {
        self.map.len()
    }

    fn pair_labels(&self, values: &[String]) -> Vec<(String, String)> {
        self.label_names
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, escape_help(&self.help));
        let _ = writeln!(out, "# TYPE {} histogram", self.name);
        for s in self.snapshot() {
            let label_str = s
                .labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let suffix = if label_str.is_empty() { String::new() } else { format!(",{}", label_str) };

            for (le, count) in &s.buckets {
                let _ = writeln!(out, "{}_bucket{{le=\"{}\"{}}} {}", self.name, le, suffix, count);
            }
            let _ = writeln!(out, "{}_bucket{{le=\"+Inf\"{}}} {}", self.name, suffix, s.count);

            if label_str.is_empty() {
                let _ = writeln!(out, "{}_sum {}", self.name, s.sum);
                let _ = writeln!(out, "{}_count {}", self.name, s.count);
            } else {
                let _ = writeln!(out, "{}_sum{{{}}} {}", self.name, label_str, s.sum);
                let _ = writeln!(out, "{}_count{{{}}} {}", self.name, label_str, s.count);
            }
        }
    }
}

/// Mapping from metric name to histogram family, plus the optional default
/// process collector.
pub struct MetricsRegistry {
    histograms: DashMap<String, Arc<HistogramVec>>,
    process: Option<ProcessCollector>,
}

impl MetricsRegistry {
    pub fn new(default_metrics: bool) -> Self {
        Self {
            histograms: DashMap::new(),
            process: default_metrics.then(ProcessCollector::new),
        }
    }

    /// Register a family. If the name is already taken the existing family is
    /// returned and `hist` is discarded.
    pub fn register_histogram(&self, hist: HistogramVec) -> Arc<HistogramVec> {
        self.histograms
            .entry(hist.name.clone())
            .or_insert_with(|| Arc::new(hist))
            .value()
            .clone()
    }

    pub fn histogram(&self, name: &str) -> Option<Arc<HistogramVec>> {
        self.histograms.get(name).map(|r| Arc::clone(r.value()))
    }

    /// Render all registered families, then process metrics, then any extra
    /// gauge lines provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut families: Vec<Arc<HistogramVec>> =
            self.histograms.iter().map(|r| Arc::clone(r.value())).collect();
        families.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = String::new();
        for h in &families {
            h.render(&mut out);
        }
        if let Some(p) = &self.process {
            p.render(&mut out);
        }
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {} gauge\n{} {}", k, k, v);
        }
        out
    }
}

/// Label tuple of one HTTP request observation.
#[derive(Debug, Clone, Copy)]
pub struct RequestLabels<'a> {
    pub method: &'a str,
    pub route: &'a str,
    pub status_code: u16,
}

/// Registry plus a handle on the request latency family.
pub struct AppMetrics {
    registry: MetricsRegistry,
    http_duration: Arc<HistogramVec>,
}

impl AppMetrics {
    pub fn new(default_metrics: bool) -> Self {
        let registry = MetricsRegistry::new(default_metrics);
        let http_duration = registry.register_histogram(HistogramVec::new(
            HTTP_REQUEST_DURATION_MS,
            "Duration of HTTP requests in ms",
            &["method", "route", "status_code"],
            &HTTP_DURATION_BUCKETS_MS,
        ));
        Self { registry, http_duration }
    }

    /// Record one request latency.
    pub fn observe_request(&self, labels: RequestLabels<'_>, value_ms: f64) {
        let status = labels.status_code.to_string();
        self.http_duration
            .observe(&[labels.method, labels.route, status.as_str()], value_ms);
    }

    pub fn http_duration(&self) -> &HistogramVec {
        &self.http_duration
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        self.registry.render(extra)
    }
}
