//! Activity store façade.
//!
//! Backend-agnostic activity-by-id storage: a sharded hash keyed by
//! activity id, with the codec choice owned here. Timelines only hold
//! references; removing an activity from a feed never deletes the
//! canonical record — only `flush` clears the namespace.

use std::collections::HashMap;
use std::sync::Arc;

use fanout_codec::{ActivitySerializer, Serializer};
use fanout_core::{Activity, FeedError, FeedItem, Metrics, NoopMetrics, Result};
use tracing::debug;

use crate::backend::HashBackend;
use crate::sharded::{ShardedHash, ShardingConfig};

/// Activity-by-id storage over a sharded hash.
pub struct ActivityStore {
    cache: ShardedHash,
    serializer: Arc<dyn Serializer>,
    metrics: Arc<dyn Metrics>,
    label: String,
}

impl ActivityStore {
    /// Store over the `global` namespace with the compact activity codec.
    pub fn new(backend: Arc<dyn HashBackend>) -> Self {
        Self::with_namespace(backend, "global")
    }

    /// Store over an explicit namespace.
    pub fn with_namespace(backend: Arc<dyn HashBackend>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            cache: ShardedHash::new(backend, namespace.clone()),
            serializer: Arc::new(ActivitySerializer::new()),
            metrics: Arc::new(NoopMetrics),
            label: namespace,
        }
    }

    /// Swap the codec.
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Attach a metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Override the sharding layout.
    pub fn with_sharding(mut self, config: ShardingConfig) -> Self {
        self.cache = self.cache.with_config(config);
        self
    }

    /// Fetch activities by id. Ids with no (or empty) stored value are
    /// absent from the result; reads of missing data are never errors.
    pub fn get(&self, ids: &[u64]) -> Result<HashMap<u64, Activity>> {
        let _timer = self.metrics.feed_reads_timer(&self.label);

        let fields: Vec<String> = ids.iter().map(u64::to_string).collect();
        let hits = self.cache.get_many(&fields)?;

        let mut activities = HashMap::with_capacity(hits.len());
        for (field, token) in hits {
            let id = field
                .parse::<u64>()
                .map_err(|e| FeedError::Serialization(format!("bad stored id {field:?}: {e}")))?;
            match self.serializer.decode(&token)? {
                FeedItem::Activity(activity) => {
                    activities.insert(id, activity);
                }
                other => {
                    return Err(FeedError::TypeMismatch {
                        expected: "activity",
                        actual: other.kind(),
                    })
                }
            }
        }

        self.metrics.on_feed_read(&self.label, activities.len());
        Ok(activities)
    }

    /// Write activities keyed by id, returning how many were durably
    /// applied. Writes are overwrites, so retrying a partially applied
    /// batch is safe; a whole-batch backend failure reports zero.
    pub fn add(&self, activities: &[(u64, Activity)]) -> Result<usize> {
        let mut pairs = Vec::with_capacity(activities.len());
        for (id, activity) in activities {
            let token = self
                .serializer
                .encode(&FeedItem::Activity(activity.clone()))?;
            pairs.push((id.to_string(), token));
        }

        let written = self.cache.set_many(&pairs);
        self.metrics.on_feed_write(&self.label, written);
        debug!(namespace = %self.label, requested = activities.len(), written, "activity add");
        Ok(written)
    }

    /// Remove activities from the cache. This is a cache-only removal:
    /// the canonical record elsewhere is not this layer's to delete.
    pub fn remove(&self, ids: &[u64]) -> Result<usize> {
        let fields: Vec<String> = ids.iter().map(u64::to_string).collect();
        let removed = self.cache.delete_many(&fields)?;
        self.metrics.on_feed_remove(&self.label, removed);
        Ok(removed)
    }

    /// Drop the whole namespace. Destructive and unconfirmed; meant for
    /// tests and resets.
    pub fn flush(&self) -> Result<()> {
        self.cache.delete()
    }
}
