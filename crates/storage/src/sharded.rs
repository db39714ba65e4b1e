//! Sharded hash structure.
//!
//! A logical hash map split across a fixed set of physical keys so no
//! single backend structure grows unbounded and load spreads across the
//! keyspace. Shard selection is a pure function of the field (xxh3 with
//! the default seed), so the same id always routes to the same shard —
//! across process restarts and across independently constructed clients.

use std::collections::HashMap;
use std::sync::Arc;

use fanout_core::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::backend::HashBackend;

/// Sharding layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingConfig {
    /// Namespace prefix of every physical key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Number of physical shards. Changing this reshuffles every field,
    /// so it is fixed for the lifetime of stored data.
    #[serde(default = "default_shard_count")]
    pub shard_count: u32,
}

fn default_key_prefix() -> String {
    "activity:cache".to_string()
}

fn default_shard_count() -> u32 {
    10
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            shard_count: default_shard_count(),
        }
    }
}

/// A hash map sharded across `shard_count` physical keys.
///
/// Physical keys have the form `{prefix}:{base_key}:{shard}`. The
/// structure is a stateless façade over the backend handle; separately
/// constructed instances with the same configuration address the same
/// data.
pub struct ShardedHash {
    backend: Arc<dyn HashBackend>,
    base_key: String,
    config: ShardingConfig,
}

impl ShardedHash {
    /// Sharded hash with the default layout.
    pub fn new(backend: Arc<dyn HashBackend>, base_key: impl Into<String>) -> Self {
        Self {
            backend,
            base_key: base_key.into(),
            config: ShardingConfig::default(),
        }
    }

    /// Override the sharding layout.
    pub fn with_config(mut self, config: ShardingConfig) -> Self {
        self.config = config;
        self
    }

    /// Physical key owning `field`.
    pub fn shard_key_for(&self, field: &str) -> String {
        let shard = xxh3_64(field.as_bytes()) % u64::from(self.config.shard_count);
        format!("{}:{}:{}", self.config.key_prefix, self.base_key, shard)
    }

    /// Every physical key of this structure.
    pub fn shard_keys(&self) -> Vec<String> {
        (0..self.config.shard_count)
            .map(|shard| format!("{}:{}:{}", self.config.key_prefix, self.base_key, shard))
            .collect()
    }

    fn group_by_shard<'a>(&self, fields: &'a [String]) -> FxHashMap<String, Vec<&'a String>> {
        let mut groups: FxHashMap<String, Vec<&String>> = FxHashMap::default();
        for field in fields {
            groups
                .entry(self.shard_key_for(field))
                .or_default()
                .push(field);
        }
        groups
    }

    /// Fetch many fields. Missing fields and empty values are dropped
    /// from the result, never reported as errors.
    pub fn get_many(&self, fields: &[String]) -> Result<HashMap<String, String>> {
        let mut result = HashMap::with_capacity(fields.len());
        for (shard_key, shard_fields) in self.group_by_shard(fields) {
            let owned: Vec<String> = shard_fields.iter().map(|f| (*f).clone()).collect();
            let hits = self.backend.get_many(&shard_key, &owned)?;
            result.extend(hits.into_iter().filter(|(_, v)| !v.is_empty()));
        }
        Ok(result)
    }

    /// Write many field/value pairs, returning how many were durably
    /// applied. A shard whose batch fails contributes zero to the count;
    /// callers treat less-than-requested as a retryable partial failure.
    pub fn set_many(&self, pairs: &[(String, String)]) -> usize {
        let mut by_shard: FxHashMap<String, Vec<(String, String)>> = FxHashMap::default();
        for (field, value) in pairs {
            by_shard
                .entry(self.shard_key_for(field))
                .or_default()
                .push((field.clone(), value.clone()));
        }

        let mut written = 0;
        for (shard_key, shard_pairs) in by_shard {
            match self.backend.set_many(&shard_key, &shard_pairs) {
                Ok(count) => written += count,
                Err(err) => {
                    warn!(shard_key = %shard_key, error = %err, "shard batch write failed");
                }
            }
        }
        debug!(requested = pairs.len(), written, "sharded set_many");
        written
    }

    /// Remove many fields, returning how many existed.
    pub fn delete_many(&self, fields: &[String]) -> Result<usize> {
        let mut removed = 0;
        for (shard_key, shard_fields) in self.group_by_shard(fields) {
            let owned: Vec<String> = shard_fields.iter().map(|f| (*f).clone()).collect();
            removed += self.backend.delete_many(&shard_key, &owned)?;
        }
        Ok(removed)
    }

    /// Drop the entire namespace: every physical shard key.
    pub fn delete(&self) -> Result<()> {
        for shard_key in self.shard_keys() {
            self.backend.delete(&shard_key)?;
        }
        Ok(())
    }
}
