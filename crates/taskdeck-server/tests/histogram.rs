//! Aggregator properties: bucket membership, totals, and concurrency.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use taskdeck_server::obs::metrics::{
    AppMetrics, HistogramVec, RequestLabels, HTTP_DURATION_BUCKETS_MS, HTTP_REQUEST_DURATION_MS,
};

const LABELS: [&str; 3] = ["method", "route", "status_code"];

fn http_hist() -> HistogramVec {
    HistogramVec::new("t_ms", "test", &LABELS, &HTTP_DURATION_BUCKETS_MS)
}

#[test]
fn bucket_increments_iff_value_within_bound() {
    let values = [0.0, 10.0, 50.0, 50.5, 99.9, 100.0, 250.0, 500.0, 999.0, 1000.0, 1000.1, 5000.0];
    for v in values {
        let h = http_hist();
        h.observe(&["GET", "/", "200"], v);
        let s = h.get(&["GET", "/", "200"]).unwrap();
        for (le, count) in &s.buckets {
            let expected = u64::from(v <= *le);
            assert_eq!(*count, expected, "value {v} bucket {le}");
        }
        assert_eq!(s.count, 1);
        assert_eq!(s.sum, v);
    }
}

#[test]
fn total_count_matches_calls_per_tuple() {
    let h = http_hist();
    for i in 0..7 {
        h.observe(&["GET", "/", "200"], f64::from(i) * 100.0);
    }
    for _ in 0..3 {
        h.observe(&["GET", "/", "500"], 1.0);
    }

    let ok = h.get(&["GET", "/", "200"]).unwrap();
    let err = h.get(&["GET", "/", "500"]).unwrap();
    assert_eq!(ok.count, 7);
    assert_eq!(err.count, 3);
    assert_eq!(ok.sum, 2100.0);
    assert_eq!(h.series_count(), 2);
    assert!(h.get(&["POST", "/", "200"]).is_none());
}

#[test]
fn buckets_are_cumulative() {
    let h = http_hist();
    for v in [10.0, 75.0, 150.0, 350.0, 450.0, 700.0, 2000.0] {
        h.observe(&["PUT", "/:id", "200"], v);
    }
    let s = h.get(&["PUT", "/:id", "200"]).unwrap();
    let counts: Vec<u64> = s.buckets.iter().map(|(_, c)| *c).collect();
    assert_eq!(counts, vec![1, 2, 3, 3, 4, 5, 6]);
    assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(s.count, 7);
}

#[test]
fn bounds_are_sorted_and_deduplicated() {
    let h = HistogramVec::new("x", "x", &[], &[300.0, 50.0, 50.0, f64::INFINITY, 100.0]);
    assert_eq!(h.bounds(), &[50.0, 100.0, 300.0]);

    h.observe(&[], 75.0);
    let s = h.get(&[]).unwrap();
    assert_eq!(s.bucket(50.0), Some(0));
    assert_eq!(s.bucket(100.0), Some(1));
}

#[test]
fn label_arity_mismatch_is_dropped() {
    let h = http_hist();
    h.observe(&["GET", "/"], 1.0);
    assert_eq!(h.series_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_observes_lose_nothing() {
    let metrics = Arc::new(AppMetrics::new(false));

    let handles: Vec<_> = (0..1000)
        .map(|_| {
            let m = Arc::clone(&metrics);
            tokio::spawn(async move {
                m.observe_request(
                    RequestLabels { method: "GET", route: "/", status_code: 200 },
                    10.0,
                );
            })
        })
        .collect();
    for r in futures_util::future::join_all(handles).await {
        r.unwrap();
    }

    let s = metrics.http_duration().get(&["GET", "/", "200"]).unwrap();
    assert_eq!(s.count, 1000);
    for (le, count) in &s.buckets {
        assert!(*le >= 10.0);
        assert_eq!(*count, 1000, "bucket {le}");
    }
    assert_eq!(s.sum, 10_000.0);
}

#[test]
fn concurrent_observes_across_tuples() {
    let h = Arc::new(http_hist());
    std::thread::scope(|scope| {
        for t in 0..8 {
            let h = Arc::clone(&h);
            scope.spawn(move || {
                let status = if t % 2 == 0 { "200" } else { "500" };
                for _ in 0..500 {
                    h.observe(&["GET", "/", status], 120.0);
                }
            });
        }
    });

    for status in ["200", "500"] {
        let s = h.get(&["GET", "/", status]).unwrap();
        assert_eq!(s.count, 2000);
        assert_eq!(s.bucket(100.0), Some(0));
        assert_eq!(s.bucket(200.0), Some(2000));
    }
}

#[test]
fn app_metrics_registers_request_histogram() {
    let m = AppMetrics::new(false);
    assert!(m.registry().histogram(HTTP_REQUEST_DURATION_MS).is_some());
    assert_eq!(m.http_duration().bounds(), &HTTP_DURATION_BUCKETS_MS);
}
