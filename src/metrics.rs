#![allow(dead_code)] // This entire file is feature-gated
//! Vendor-agnostic metrics collection via a pluggable sink.
//!
//! This module provides a trait-based sink pattern that allows consumers to
//! collect per-pass metrics without tying the library to a specific metrics
//! backend (Prometheus, OpenTelemetry, CloudWatch, etc.).
//!
//! **Note:** This module is only available when the `observability` feature
//! is enabled.
//!
//! ## Usage
//!
//! Implement the [`MetricsSink`] trait to process pass events:
//!
//! ```ignore
//! use tickconf_core::metrics::{MetricsSink, PassStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct CounterSink {
//!     passes: AtomicU64,
//! }
//!
//! impl MetricsSink for CounterSink {
//!     fn on_pass(&self, stats: &PassStats) {
//!         self.passes.fetch_add(1, Ordering::Relaxed);
//!         eprintln!("{} pass took {:?}", stats.dialect, stats.duration);
//!     }
//! }
//!
//! // Set the global sink once at startup:
//! tickconf_core::metrics::set_sink(Arc::new(CounterSink { passes: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

/// Snapshot of one patch pass, passed to [`MetricsSink::on_pass`].
///
/// # Fields
///
/// * `dialect` - Which vocabulary the pass ran under (`"acl"` or `"locator"`).
/// * `duration` - Total wall-clock time for the pass, including all I/O
///   performed through the reader and writer.
/// * `lines_read` / `lines_written` - Document sizes on both sides; a pass
///   that deletes entities writes fewer lines than it reads, one that adds
///   entities writes more.
/// * `actions_total` / `actions_applied` - How many actions the pass carried
///   and how many of them found a match.
#[derive(Debug, Clone, Serialize)]
pub struct PassStats {
    /// Dialect name the engine ran under
    pub dialect: &'static str,
    /// Total time spent in the pass
    pub duration: Duration,
    /// Lines pulled from the reader
    pub lines_read: usize,
    /// Lines pushed to the writer
    pub lines_written: usize,
    /// Actions the pass carried
    pub actions_total: usize,
    /// Actions that executed at least once
    pub actions_applied: usize,
}

impl PassStats {
    /// Actions that never found a match.
    pub fn actions_unmatched(&self) -> usize {
        self.actions_total - self.actions_applied
    }
}

/// Trait for consuming patch pass metrics.
///
/// Implement this trait to collect engine metrics and send them to any
/// backend. The trait is invoked by the engine after each pass.
/// Implementations must be thread-safe (hence the `Send + Sync` bounds)
/// and should not block.
///
/// If no sink is explicitly set via [`set_sink`], a built-in no-op sink is
/// used, so there is no overhead when metrics are not needed.
pub trait MetricsSink: Send + Sync {
    /// Called after each pass with sizes, counts and timing.
    fn on_pass(&self, stats: &PassStats);
}

/// No-op sink; metrics are silently dropped.
struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_pass(&self, _stats: &PassStats) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

fn sink() -> Arc<dyn MetricsSink> {
    SINK.get_or_init(|| Arc::new(NoOpSink)).clone()
}

/// Set the global metrics sink.
///
/// Call this once at application startup, before the first pass. The sink
/// cannot be hot-swapped: once set (or once the first pass has installed
/// the no-op default), later calls are ignored with a warning.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. Set the sink before the first pass."
        );
    }
}

/// Record a completed pass. Called internally by the engine.
pub(crate) fn record_pass(stats: PassStats) {
    sink().on_pass(&stats);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_stats_serialization() {
        let stats = PassStats {
            dialect: "acl",
            duration: Duration::from_millis(3),
            lines_read: 120,
            lines_written: 118,
            actions_total: 2,
            actions_applied: 2,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("acl"));
        assert!(json.contains("120"));
    }

    #[test]
    fn test_unmatched_count() {
        let stats = PassStats {
            dialect: "locator",
            duration: Duration::ZERO,
            lines_read: 10,
            lines_written: 10,
            actions_total: 3,
            actions_applied: 1,
        };
        assert_eq!(stats.actions_unmatched(), 2);
    }

    #[test]
    fn test_record_pass_with_no_op_sink() {
        // Default sink is no-op, so this should not panic
        record_pass(PassStats {
            dialect: "acl",
            duration: Duration::from_micros(10),
            lines_read: 0,
            lines_written: 0,
            actions_total: 0,
            actions_applied: 0,
        });
    }

    #[test]
    fn test_noop_sink_impl() {
        let sink = NoOpSink;
        sink.on_pass(&PassStats {
            dialect: "locator",
            duration: Duration::ZERO,
            lines_read: 1,
            lines_written: 1,
            actions_total: 0,
            actions_applied: 0,
        });
    }
}
