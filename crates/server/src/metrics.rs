//! Prometheus metrics for observability.
//!
//! HTTP request metrics plus gallery gauges collected on scrape. Domain
//! counters (ingested cats, like toggles) live in the core crate and are
//! registered here.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "whiskerboard_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("whiskerboard_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "whiskerboard_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "whiskerboard_auth_failures_total",
            "Total authentication failures",
        ),
        &["reason"],
    )
    .unwrap()
});

// =============================================================================
// Gallery Metrics (collected dynamically)
// =============================================================================

/// Persisted cats.
pub static GALLERY_CATS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("whiskerboard_gallery_cats", "Number of persisted cats").unwrap()
});

/// Like rows.
pub static GALLERY_LIKES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("whiskerboard_gallery_likes", "Number of like rows").unwrap()
});

/// Distinct users with at least one like.
pub static GALLERY_LIKERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "whiskerboard_gallery_likers",
        "Distinct users with at least one like",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Gallery
    registry.register(Box::new(GALLERY_CATS.clone())).unwrap();
    registry.register(Box::new(GALLERY_LIKES.clone())).unwrap();
    registry.register(Box::new(GALLERY_LIKERS.clone())).unwrap();

    // Core metrics (ingestion and like toggle counters)
    for metric in whiskerboard_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gallery gauges reflect current row counts.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.gallery().store().stats() {
        GALLERY_CATS.set(stats.total_cats as i64);
        GALLERY_LIKES.set(stats.total_likes as i64);
        GALLERY_LIKERS.set(stats.distinct_likers as i64);
    }
}

/// Normalize a path for metric labels (replace the api id segment with a
/// placeholder so label cardinality stays bounded).
pub fn normalize_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("/api/v1/cats/") {
        if let Some((_, "like")) = rest.split_once('/') {
            return "/api/v1/cats/{api_id}/like".to_string();
        }
    }
    path.to_string()
}
