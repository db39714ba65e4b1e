//! Metrics sink interface.
//!
//! Storage façades report counters and timing spans through this trait.
//! The sink is a collaborator, never on the critical path: every method is
//! infallible by signature, so a misbehaving sink cannot surface as a
//! storage error.

use std::time::{Duration, Instant};

/// Receiver for feed storage counters and timers, scoped per feed type.
///
/// All methods default to no-ops so sinks implement only what they report.
pub trait Metrics: Send + Sync {
    /// `count` activities were read from `feed`.
    fn on_feed_read(&self, feed: &str, count: usize) {
        let _ = (feed, count);
    }

    /// `count` activities were written to `feed`.
    fn on_feed_write(&self, feed: &str, count: usize) {
        let _ = (feed, count);
    }

    /// `count` activities were removed from `feed`.
    fn on_feed_remove(&self, feed: &str, count: usize) {
        let _ = (feed, count);
    }

    /// A fan-out `operation` touched `count` activities on `feed`.
    fn on_fanout(&self, feed: &str, operation: &str, count: usize) {
        let _ = (feed, operation, count);
    }

    /// One activity was published to the system.
    fn on_activity_published(&self) {}

    /// One activity was removed from the system.
    fn on_activity_removed(&self) {}

    /// Start a fan-out latency span for `feed`.
    fn fanout_timer(&self, feed: &str) -> MetricsTimer {
        let _ = feed;
        MetricsTimer::disabled()
    }

    /// Start a read latency span for `feed`.
    fn feed_reads_timer(&self, feed: &str) -> MetricsTimer {
        let _ = feed;
        MetricsTimer::disabled()
    }
}

/// Drop guard for a timing span. Records elapsed time when dropped.
pub struct MetricsTimer {
    start: Instant,
    record: Option<Box<dyn FnOnce(Duration) + Send>>,
}

impl MetricsTimer {
    /// Timer that reports its elapsed time to `record` on drop.
    pub fn new(record: impl FnOnce(Duration) + Send + 'static) -> Self {
        Self {
            start: Instant::now(),
            record: Some(Box::new(record)),
        }
    }

    /// Timer that records nothing.
    pub fn disabled() -> Self {
        Self {
            start: Instant::now(),
            record: None,
        }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            record(self.start.elapsed());
        }
    }
}

/// Sink that discards everything. The default for stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {}

/// Sink that emits counters and spans as `tracing` events under the
/// `fanout::metrics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl Metrics for TracingMetrics {
    fn on_feed_read(&self, feed: &str, count: usize) {
        tracing::debug!(target: "fanout::metrics", feed, count, "reads");
    }

    fn on_feed_write(&self, feed: &str, count: usize) {
        tracing::debug!(target: "fanout::metrics", feed, count, "writes");
    }

    fn on_feed_remove(&self, feed: &str, count: usize) {
        tracing::debug!(target: "fanout::metrics", feed, count, "deletes");
    }

    fn on_fanout(&self, feed: &str, operation: &str, count: usize) {
        tracing::debug!(target: "fanout::metrics", feed, operation, count, "fanout");
    }

    fn on_activity_published(&self) {
        tracing::debug!(target: "fanout::metrics", "activities.published");
    }

    fn on_activity_removed(&self) {
        tracing::debug!(target: "fanout::metrics", "activities.removed");
    }

    fn fanout_timer(&self, feed: &str) -> MetricsTimer {
        let feed = feed.to_string();
        MetricsTimer::new(move |elapsed| {
            tracing::debug!(target: "fanout::metrics", feed = %feed, ?elapsed, "fanout_latency");
        })
    }

    fn feed_reads_timer(&self, feed: &str) -> MetricsTimer {
        let feed = feed.to_string();
        MetricsTimer::new(move |elapsed| {
            tracing::debug!(target: "fanout::metrics", feed = %feed, ?elapsed, "read_latency");
        })
    }
}
