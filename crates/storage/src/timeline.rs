//! Timeline store façade and the batch (pipelining) context.
//!
//! One score-ordered structure per feed key. The store translates filter
//! kwargs and ordering args before anything reaches the backend, and
//! hands out a scoped batch context so fan-out code can coalesce many
//! feed mutations into one backend round trip. Batches are NOT
//! transactional: on failure, already-applied operations stay applied,
//! which is safe because every write here is an overwrite.

use std::sync::Arc;

use fanout_core::{FeedError, Metrics, NoopMetrics, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::{ItemResult, ScoreBackend};
use crate::filters::{translate_filters, FilterValue};
use crate::sorted::SortedRange;

/// Timeline behavior configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Default sort direction; false is most-recent-first.
    #[serde(default)]
    pub sort_asc: bool,
}

/// Per-feed timeline storage over a score backend.
pub struct TimelineStore {
    backend: Arc<dyn ScoreBackend>,
    metrics: Arc<dyn Metrics>,
    label: String,
    config: TimelineConfig,
}

impl TimelineStore {
    /// Timeline store with descending feeds and no metrics sink.
    pub fn new(backend: Arc<dyn ScoreBackend>) -> Self {
        Self {
            backend,
            metrics: Arc::new(NoopMetrics),
            label: "timeline".to_string(),
            config: TimelineConfig::default(),
        }
    }

    /// Label used to scope metrics (typically the feed type name).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Attach a metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Override the timeline configuration.
    pub fn with_config(mut self, config: TimelineConfig) -> Self {
        self.config = config;
        self
    }

    /// The score-ordered view of one feed key.
    pub fn range(&self, key: &str) -> SortedRange {
        SortedRange::new(Arc::clone(&self.backend), key).with_sort_asc(self.config.sort_asc)
    }

    /// Slice a feed: rank range `[start, stop)`, optionally filtered and
    /// reordered. Returns (score, member) pairs, score first, ready for
    /// downstream decoding.
    ///
    /// Filter kwargs accept exactly `activity_id__gte/lte/gt/lt` with
    /// numeric values; ordering accepts at most one of `activity_id` /
    /// `-activity_id`. Anything else fails before touching the backend.
    pub fn get_slice(
        &self,
        key: &str,
        start: usize,
        stop: Option<usize>,
        filter_kwargs: &[(String, FilterValue)],
        ordering_args: &[String],
    ) -> Result<Vec<(f64, String)>> {
        let translated = translate_filters(filter_kwargs, ordering_args)?;
        let sort_asc = translated.sort_asc.unwrap_or(self.config.sort_asc);

        let _timer = self.metrics.feed_reads_timer(&self.label);
        let results = self.backend.get_results(
            key,
            start,
            stop,
            translated.min_score.as_deref(),
            translated.max_score.as_deref(),
            sort_asc,
        )?;
        self.metrics.on_feed_read(&self.label, results.len());

        Ok(results
            .into_iter()
            .map(|(member, score)| (score, member))
            .collect())
    }

    /// Add (score, member) pairs to a feed, or queue them on `batch`.
    ///
    /// Applied immediately, any per-item backend error is fatal and
    /// raised; queued, results surface on commit.
    pub fn add_many(
        &self,
        key: &str,
        pairs: &[(f64, String)],
        batch: Option<&mut TimelineBatch>,
    ) -> Result<usize> {
        if let Some(batch) = batch {
            batch.queue_add(key, pairs);
            return Ok(pairs.len());
        }

        let results = self.backend.add_many(key, pairs)?;
        raise_item_errors(results)?;
        self.metrics.on_feed_write(&self.label, pairs.len());
        debug!(key, count = pairs.len(), "timeline add");
        Ok(pairs.len())
    }

    /// Remove members from a feed, or queue the removal on `batch`.
    pub fn remove_many(
        &self,
        key: &str,
        members: &[String],
        batch: Option<&mut TimelineBatch>,
    ) -> Result<usize> {
        if let Some(batch) = batch {
            batch.queue_remove(key, members);
            return Ok(members.len());
        }

        let removed = self.backend.remove_many(key, members)?;
        self.metrics.on_feed_remove(&self.label, removed);
        debug!(key, removed, "timeline remove");
        Ok(removed)
    }

    /// Number of entries in a feed.
    pub fn count(&self, key: &str) -> Result<usize> {
        self.backend.count(key)
    }

    /// Membership test for a feed entry.
    pub fn contains(&self, key: &str, member: &str) -> Result<bool> {
        self.backend.contains(key, member)
    }

    /// Rank of a member in the feed's configured order.
    pub fn index_of(&self, key: &str, member: &str) -> Result<usize> {
        self.backend.index_of(key, member, self.config.sort_asc)
    }

    /// Truncate a feed to at most `length` entries, or queue the trim.
    pub fn trim(
        &self,
        key: &str,
        length: usize,
        batch: Option<&mut TimelineBatch>,
    ) -> Result<usize> {
        if let Some(batch) = batch {
            batch.queue_trim(key, length);
            return Ok(0);
        }
        self.backend.trim(key, length, self.config.sort_asc)
    }

    /// Drop a feed entirely.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.backend.delete(key)
    }

    /// Scoped batch context for coalescing mutations across many feed
    /// keys. Commit applies everything queued; dropping the context
    /// without committing discards it.
    pub fn get_batch_interface(&self) -> TimelineBatch {
        TimelineBatch {
            backend: Arc::clone(&self.backend),
            metrics: Arc::clone(&self.metrics),
            label: self.label.clone(),
            sort_asc: self.config.sort_asc,
            ops: Vec::new(),
            committed: false,
        }
    }
}

fn raise_item_errors(results: Vec<ItemResult>) -> Result<()> {
    for result in results {
        if let Err(item) = result {
            return Err(FeedError::BatchItem {
                member: item.member,
                reason: item.reason,
            });
        }
    }
    Ok(())
}

enum BatchOp {
    Add { key: String, pairs: Vec<(f64, String)> },
    Remove { key: String, members: Vec<String> },
    Trim { key: String, length: usize },
}

/// Non-transactional pipelining context for timeline mutations.
///
/// Operations queue in order and apply on [`commit`](Self::commit).
/// Partial application across keys is possible on backend failure;
/// callers retry the whole batch, which is safe because timeline writes
/// are overwrites.
pub struct TimelineBatch {
    backend: Arc<dyn ScoreBackend>,
    metrics: Arc<dyn Metrics>,
    label: String,
    sort_asc: bool,
    ops: Vec<BatchOp>,
    committed: bool,
}

impl TimelineBatch {
    /// Queue an add against `key`.
    pub fn queue_add(&mut self, key: &str, pairs: &[(f64, String)]) {
        self.ops.push(BatchOp::Add {
            key: key.to_string(),
            pairs: pairs.to_vec(),
        });
    }

    /// Queue a removal against `key`.
    pub fn queue_remove(&mut self, key: &str, members: &[String]) {
        self.ops.push(BatchOp::Remove {
            key: key.to_string(),
            members: members.to_vec(),
        });
    }

    /// Queue a trim against `key`.
    pub fn queue_trim(&mut self, key: &str, length: usize) {
        self.ops.push(BatchOp::Trim {
            key: key.to_string(),
            length,
        });
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every queued operation in order, returning one result per
    /// operation (the affected-entry count on success). A failing
    /// operation does not roll back or stop the ones around it.
    pub fn commit(mut self) -> Vec<Result<usize>> {
        self.committed = true;
        let ops = std::mem::take(&mut self.ops);
        let _timer = self.metrics.fanout_timer(&self.label);

        let mut outcomes = Vec::with_capacity(ops.len());
        for op in ops {
            let outcome = match op {
                BatchOp::Add { key, pairs } => self
                    .backend
                    .add_many(&key, &pairs)
                    .and_then(|results| {
                        raise_item_errors(results)?;
                        self.metrics.on_fanout(&self.label, "add", pairs.len());
                        Ok(pairs.len())
                    }),
                BatchOp::Remove { key, members } => {
                    self.backend.remove_many(&key, &members).map(|removed| {
                        self.metrics.on_fanout(&self.label, "remove", removed);
                        removed
                    })
                }
                BatchOp::Trim { key, length } => {
                    self.backend.trim(&key, length, self.sort_asc).map(|removed| {
                        self.metrics.on_fanout(&self.label, "trim", removed);
                        removed
                    })
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl Drop for TimelineBatch {
    fn drop(&mut self) {
        if !self.committed && !self.ops.is_empty() {
            warn!(
                pending = self.ops.len(),
                "timeline batch dropped without commit; queued operations discarded"
            );
        }
    }
}
