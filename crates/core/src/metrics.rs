//! Domain metrics emitted by the gallery service.
//!
//! Registered into the server's Prometheus registry via [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{core::Collector, IntCounter, IntCounterVec, Opts};

/// Cats persisted by ingestion.
pub static CATS_INGESTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "whiskerboard_cats_ingested_total",
        "Total cat rows persisted by ingestion",
    )
    .unwrap()
});

/// Detached ingest runs by outcome.
pub static INGEST_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "whiskerboard_ingest_runs_total",
            "Detached ingest runs by outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// Like toggles by outcome (liked, unliked, rejected).
pub static LIKE_TOGGLES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "whiskerboard_like_toggles_total",
            "Like toggle calls by outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// All core metrics, for registration by the server.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(CATS_INGESTED_TOTAL.clone()),
        Box::new(INGEST_RUNS_TOTAL.clone()),
        Box::new(LIKE_TOGGLES_TOTAL.clone()),
    ]
}
