//! In-memory backend.
//!
//! Reference implementation of both capability traits, and the backend of
//! choice for tests and single-process deployments. DashMap keys the
//! top-level namespaces so callers on distinct keys never contend; inside
//! a key, hashes are FxHashMaps and score sets keep a BTreeSet ordered by
//! (score, member) — equal scores tie-break on member value by
//! construction, which keeps repeated slices stable.

use std::collections::{BTreeSet, HashMap};

use dashmap::DashMap;
use fanout_core::{FeedError, Result};
use rustc_hash::FxHashMap;

use crate::backend::{HashBackend, ItemResult, ScoreBackend, ScoreBound};

/// f64 with a total order, usable inside a BTreeSet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TotalF64(f64);

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One key's score-ordered set.
///
/// The member index mirrors the BTreeSet so score updates and membership
/// tests stay O(1)/O(log n) instead of scanning.
#[derive(Debug, Default)]
struct ScoreSet {
    by_score: BTreeSet<(TotalF64, String)>,
    scores: FxHashMap<String, f64>,
}

impl ScoreSet {
    /// Insert or update a member. True when the member was newly added.
    fn insert(&mut self, score: f64, member: String) -> bool {
        let newly_added = match self.scores.insert(member.clone(), score) {
            Some(old) => {
                self.by_score.remove(&(TotalF64(old), member.clone()));
                false
            }
            None => true,
        };
        self.by_score.insert((TotalF64(score), member));
        newly_added
    }

    /// Remove a member. True when it existed.
    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(old) => {
                self.by_score.remove(&(TotalF64(old), member.to_string()));
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.scores.len()
    }

    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Members in `sort_asc` order.
    fn ordered(&self, sort_asc: bool) -> Vec<(String, f64)> {
        let iter: Box<dyn Iterator<Item = &(TotalF64, String)>> = if sort_asc {
            Box::new(self.by_score.iter())
        } else {
            Box::new(self.by_score.iter().rev())
        };
        iter.map(|(score, member)| (member.clone(), score.0)).collect()
    }
}

/// In-memory implementation of [`HashBackend`] and [`ScoreBackend`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    hashes: DashMap<String, FxHashMap<String, String>>,
    sorted: DashMap<String, ScoreSet>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live hash keys.
    pub fn hash_key_count(&self) -> usize {
        self.hashes.len()
    }

    /// Number of live score-set keys.
    pub fn sorted_key_count(&self) -> usize {
        self.sorted.len()
    }
}

impl HashBackend for MemoryBackend {
    fn get_many(&self, key: &str, fields: &[String]) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();
        if let Some(map) = self.hashes.get(key) {
            for field in fields {
                if let Some(value) = map.get(field) {
                    result.insert(field.clone(), value.clone());
                }
            }
        }
        Ok(result)
    }

    fn set_many(&self, key: &str, pairs: &[(String, String)]) -> Result<usize> {
        if pairs.is_empty() {
            return Ok(0);
        }
        let mut map = self.hashes.entry(key.to_string()).or_default();
        for (field, value) in pairs {
            map.insert(field.clone(), value.clone());
        }
        Ok(pairs.len())
    }

    fn delete_many(&self, key: &str, fields: &[String]) -> Result<usize> {
        let mut removed = 0;
        if let Some(mut map) = self.hashes.get_mut(key) {
            for field in fields {
                if map.remove(field).is_some() {
                    removed += 1;
                }
            }
        }
        self.hashes.remove_if(key, |_, map| map.is_empty());
        Ok(removed)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.hashes.remove(key);
        Ok(())
    }
}

impl ScoreBackend for MemoryBackend {
    fn add_many(&self, key: &str, pairs: &[(f64, String)]) -> Result<Vec<ItemResult>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let mut set = self.sorted.entry(key.to_string()).or_default();
        Ok(pairs
            .iter()
            .map(|(score, member)| Ok(set.insert(*score, member.clone())))
            .collect())
    }

    fn remove_many(&self, key: &str, members: &[String]) -> Result<usize> {
        let mut removed = 0;
        if let Some(mut set) = self.sorted.get_mut(key) {
            for member in members {
                if set.remove(member) {
                    removed += 1;
                }
            }
        }
        self.sorted.remove_if(key, |_, set| set.is_empty());
        Ok(removed)
    }

    fn get_results(
        &self,
        key: &str,
        start: usize,
        stop: Option<usize>,
        min_score: Option<&str>,
        max_score: Option<&str>,
        sort_asc: bool,
    ) -> Result<Vec<(String, f64)>> {
        let min = min_score.map(ScoreBound::parse).transpose()?;
        let max = max_score.map(ScoreBound::parse).transpose()?;

        let set = match self.sorted.get(key) {
            Some(set) => set,
            None => return Ok(Vec::new()),
        };

        let limit = match stop {
            Some(stop) => stop.saturating_sub(start),
            None => usize::MAX,
        };

        Ok(set
            .ordered(sort_asc)
            .into_iter()
            .filter(|(_, score)| {
                min.as_ref().map_or(true, |b| b.admits_as_min(*score))
                    && max.as_ref().map_or(true, |b| b.admits_as_max(*score))
            })
            .skip(start)
            .take(limit)
            .collect())
    }

    fn count(&self, key: &str) -> Result<usize> {
        Ok(self.sorted.get(key).map_or(0, |set| set.len()))
    }

    fn trim(&self, key: &str, length: usize, sort_asc: bool) -> Result<usize> {
        let mut set = match self.sorted.get_mut(key) {
            Some(set) => set,
            None => return Ok(0),
        };
        if set.len() <= length {
            return Ok(0);
        }

        let excess: Vec<String> = set
            .ordered(sort_asc)
            .into_iter()
            .skip(length)
            .map(|(member, _)| member)
            .collect();
        for member in &excess {
            set.remove(member);
        }
        let removed = excess.len();
        drop(set);
        self.sorted.remove_if(key, |_, set| set.is_empty());
        Ok(removed)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.sorted.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .sorted
            .get(key)
            .map_or(false, |set| set.scores.contains_key(member)))
    }

    fn index_of(&self, key: &str, member: &str, sort_asc: bool) -> Result<usize> {
        let not_found = || FeedError::NotFound {
            key: key.to_string(),
            member: member.to_string(),
        };
        let set = self.sorted.get(key).ok_or_else(not_found)?;
        set.ordered(sort_asc)
            .iter()
            .position(|(m, _)| m == member)
            .ok_or_else(not_found)
    }
}
