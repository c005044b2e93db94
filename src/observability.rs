//! Negotiation logging and counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Log a substitution.
///
/// # Panics
///
/// Panics when either path is empty; callers always have a resolved path here.
pub fn log_file_served(
    requested_path: &str,
    served_path: &str,
    original_size: u64,
    served_size: u64,
) {
    assert!(!requested_path.is_empty(), "requested_path must not be empty");
    assert!(!served_path.is_empty(), "served_path must not be empty");

    tracing::info!(
        requested_path,
        served_path,
        original_size,
        served_size,
        "Sending alternative file"
    );
}

/// Counters for negotiation outcomes
#[derive(Debug, Default)]
pub struct NegotiationMetrics {
    requests_negotiated: AtomicU64,
    substitutions_applied: AtomicU64,
    passthroughs: AtomicU64,
}

impl NegotiationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_negotiated(&self) {
        self.requests_negotiated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn substitution_applied(&self) {
        self.substitutions_applied.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "substitutions_applied", "Metric incremented");
    }

    pub fn passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "passthroughs", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_negotiated: self.requests_negotiated.load(Ordering::Relaxed),
            substitutions_applied: self.substitutions_applied.load(Ordering::Relaxed),
            passthroughs: self.passthroughs.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_negotiated: u64,
    pub substitutions_applied: u64,
    pub passthroughs: u64,
}
