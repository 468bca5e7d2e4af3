//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Staging (files accepted into the queue)
//! - Uploads (per-item pipeline outcomes and durations)
//! - Batches (submission cycles)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Staging Metrics
// =============================================================================

/// Files staged total.
pub static ITEMS_STAGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("dropqueue_items_staged_total", "Total files staged for upload").unwrap()
});

/// Staging attempts rejected by validation.
pub static ITEMS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dropqueue_items_rejected_total",
            "Total files rejected at staging",
        ),
        &["reason"], // "too_large", "invalid"
    )
    .unwrap()
});

// =============================================================================
// Upload Metrics
// =============================================================================

/// Item pipelines finished, by result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dropqueue_uploads_total", "Total item upload pipelines finished"),
        &["result"], // "success", "storage", "registration", "timeout", "aborted"
    )
    .unwrap()
});

/// Item pipeline duration in seconds.
pub static UPLOAD_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dropqueue_upload_duration_seconds",
            "Duration of the two-phase upload per item",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Batch Metrics
// =============================================================================

/// Submission cycles, by result.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dropqueue_batches_total", "Total submission cycles"),
        &["result"], // "completed", "join_failed", "skipped"
    )
    .unwrap()
});

/// Items dispatched per batch.
pub static BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("dropqueue_batch_size", "Number of items dispatched per batch")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Staging
        Box::new(ITEMS_STAGED.clone()),
        Box::new(ITEMS_REJECTED.clone()),
        // Uploads
        Box::new(UPLOADS_TOTAL.clone()),
        Box::new(UPLOAD_DURATION.clone()),
        // Batches
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(BATCH_SIZE.clone()),
    ]
}
