//! Score-ordered structure.
//!
//! One feed's sorted collection: a typed view over a [`ScoreBackend`]
//! bound to a single key and a sort direction. Feeds default to
//! descending order (most recent first); `sort_asc` is fixed when the
//! view is built and never mutated under an in-flight query.

use std::sync::Arc;

use fanout_core::Result;

use crate::backend::{ItemResult, ScoreBackend};

/// A per-key score-ordered collection.
pub struct SortedRange {
    backend: Arc<dyn ScoreBackend>,
    key: String,
    sort_asc: bool,
}

impl SortedRange {
    /// View over `key`, descending order.
    pub fn new(backend: Arc<dyn ScoreBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            sort_asc: false,
        }
    }

    /// Set the sort direction.
    pub fn with_sort_asc(mut self, sort_asc: bool) -> Self {
        self.sort_asc = sort_asc;
        self
    }

    /// The key this view is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The configured sort direction.
    pub fn sort_asc(&self) -> bool {
        self.sort_asc
    }

    /// Insert or update (score, member) pairs. Per-item tagged results.
    pub fn add_many(&self, pairs: &[(f64, String)]) -> Result<Vec<ItemResult>> {
        self.backend.add_many(&self.key, pairs)
    }

    /// Remove members, returning how many existed.
    pub fn remove_many(&self, members: &[String]) -> Result<usize> {
        self.backend.remove_many(&self.key, members)
    }

    /// Membership test.
    pub fn contains(&self, member: &str) -> Result<bool> {
        self.backend.contains(&self.key, member)
    }

    /// Rank of `member` in the configured order; not-found when absent.
    pub fn index_of(&self, member: &str) -> Result<usize> {
        self.backend.index_of(&self.key, member, self.sort_asc)
    }

    /// Rank slice `[start, stop)` in the configured order, bounded by the
    /// optional score interval (textual filter-string bounds).
    pub fn get_results(
        &self,
        start: usize,
        stop: Option<usize>,
        min_score: Option<&str>,
        max_score: Option<&str>,
    ) -> Result<Vec<(String, f64)>> {
        self.backend
            .get_results(&self.key, start, stop, min_score, max_score, self.sort_asc)
    }

    /// Number of members.
    pub fn count(&self) -> Result<usize> {
        self.backend.count(&self.key)
    }

    /// Keep at most `length` members in the configured order.
    pub fn trim(&self, length: usize) -> Result<usize> {
        self.backend.trim(&self.key, length, self.sort_asc)
    }

    /// Drop the whole collection.
    pub fn delete(&self) -> Result<()> {
        self.backend.delete(&self.key)
    }
}
