//! Backend capability traits.
//!
//! The feed semantics run unchanged against any physical store that can
//! provide two capability sets: a batched hash (activity-by-id storage)
//! and a score-ordered collection (timeline storage). Façades and
//! structures depend only on these traits; backend quirks stay behind
//! them.
//!
//! Score bounds cross this boundary as the textual filter strings the
//! storage layout is committed to: a bare number (`"5"`) is a closed
//! (inclusive) bound, a `(`-prefixed number (`"(5"`) an open (exclusive)
//! one.

use std::collections::HashMap;

use fanout_core::{FeedError, Result};
use thiserror::Error;

/// Failure of one item inside a batched score-set write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ItemError {
    /// Member whose write failed.
    pub member: String,
    /// Backend-reported reason.
    pub reason: String,
}

/// Per-item outcome of a batched score-set write.
///
/// `Ok(true)` means the member was newly added, `Ok(false)` that an
/// existing member's score was updated.
pub type ItemResult = std::result::Result<bool, ItemError>;

/// One endpoint of a score interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBound {
    /// The bounding score.
    pub value: f64,
    /// True for an open (exclusive) bound.
    pub exclusive: bool,
}

impl ScoreBound {
    /// Closed (inclusive) bound.
    pub fn closed(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    /// Open (exclusive) bound.
    pub fn open(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }

    /// Parse a filter string: `"5"` is closed, `"(5"` open.
    pub fn parse(raw: &str) -> Result<Self> {
        let (exclusive, number) = match raw.strip_prefix('(') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let value = number
            .parse::<f64>()
            .map_err(|e| FeedError::InvalidFilter(format!("bad score bound {raw:?}: {e}")))?;
        Ok(Self { value, exclusive })
    }

    /// Whether `score` is inside the interval when this is the lower bound.
    pub fn admits_as_min(&self, score: f64) -> bool {
        if self.exclusive {
            score > self.value
        } else {
            score >= self.value
        }
    }

    /// Whether `score` is inside the interval when this is the upper bound.
    pub fn admits_as_max(&self, score: f64) -> bool {
        if self.exclusive {
            score < self.value
        } else {
            score <= self.value
        }
    }
}

impl std::fmt::Display for ScoreBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.exclusive {
            write!(f, "({}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Batched hash capability: (key, field) -> value storage.
///
/// All operations are idempotent and safe to call for keys or fields that
/// do not exist.
pub trait HashBackend: Send + Sync {
    /// Fetch `fields` under `key`. Missing fields are absent from the
    /// result, never an error.
    fn get_many(&self, key: &str, fields: &[String]) -> Result<HashMap<String, String>>;

    /// Write field/value pairs under `key`, returning how many were
    /// durably applied. A whole-batch failure reports zero written rather
    /// than an indeterminate partial count.
    fn set_many(&self, key: &str, pairs: &[(String, String)]) -> Result<usize>;

    /// Remove `fields` under `key`, returning how many existed.
    fn delete_many(&self, key: &str, fields: &[String]) -> Result<usize>;

    /// Drop `key` and everything under it.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Score-ordered collection capability: per-key (score, member) sets with
/// range queries, ranks and trimming.
pub trait ScoreBackend: Send + Sync {
    /// Insert or update (score, member) pairs under `key`, reporting a
    /// tagged result per item.
    fn add_many(&self, key: &str, pairs: &[(f64, String)]) -> Result<Vec<ItemResult>>;

    /// Remove `members` under `key`, returning how many existed.
    fn remove_many(&self, key: &str, members: &[String]) -> Result<usize>;

    /// Rank slice `[start, stop)` of the set ordered by `sort_asc`,
    /// additionally bounded by the score interval. `stop` of `None` runs
    /// to the end. Bounds use the textual filter-string form.
    fn get_results(
        &self,
        key: &str,
        start: usize,
        stop: Option<usize>,
        min_score: Option<&str>,
        max_score: Option<&str>,
        sort_asc: bool,
    ) -> Result<Vec<(String, f64)>>;

    /// Number of members under `key`.
    fn count(&self, key: &str) -> Result<usize>;

    /// Keep at most `length` members, discarding from the low-priority end
    /// given `sort_asc`. Returns how many were removed.
    fn trim(&self, key: &str, length: usize, sort_asc: bool) -> Result<usize>;

    /// Drop `key` and its whole set.
    fn delete(&self, key: &str) -> Result<()>;

    /// Membership test.
    fn contains(&self, key: &str, member: &str) -> Result<bool>;

    /// Rank of `member` in `sort_asc` order. Fails with a not-found error
    /// when the member is absent.
    fn index_of(&self, key: &str, member: &str, sort_asc: bool) -> Result<usize>;
}
