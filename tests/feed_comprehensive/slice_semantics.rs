//! Slice semantics: rank ranges, score bounds, ordering validation and
//! tie-breaking stability.

use std::sync::Arc;

use fanoutdb::{
    FeedError, FilterValue, ItemResult, MemoryBackend, Result, ScoreBackend, TimelineStore,
};

fn seeded_store(key: &str, scores: &[u64]) -> TimelineStore {
    let store = TimelineStore::new(Arc::new(MemoryBackend::new()));
    let entries: Vec<(f64, String)> = scores.iter().map(|s| (*s as f64, s.to_string())).collect();
    store.add_many(key, &entries, None).unwrap();
    store
}

fn filters(entries: &[(&str, FilterValue)]) -> Vec<(String, FilterValue)> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn descending_slice_takes_highest_scores_first() {
    let store = seeded_store("feed:13", &[1, 3, 5, 7, 9]);

    let slice = store.get_slice("feed:13", 0, Some(2), &[], &[]).unwrap();
    assert_eq!(slice, vec![(9.0, "9".to_string()), (7.0, "7".to_string())]);
}

#[test]
fn open_bound_excludes_the_boundary_score() {
    let store = seeded_store("feed:13", &[1, 3, 5, 7, 9]);

    let slice = store
        .get_slice(
            "feed:13",
            0,
            None,
            &filters(&[("activity_id__gt", 5i64.into())]),
            &[],
        )
        .unwrap();
    let scores: Vec<f64> = slice.iter().map(|(s, _)| *s).collect();
    assert_eq!(scores, vec![9.0, 7.0]);
}

#[test]
fn closed_bound_includes_the_boundary_score() {
    let store = seeded_store("feed:13", &[1, 3, 5, 7, 9]);

    let slice = store
        .get_slice(
            "feed:13",
            0,
            None,
            &filters(&[("activity_id__gte", 5i64.into())]),
            &[],
        )
        .unwrap();
    let scores: Vec<f64> = slice.iter().map(|(s, _)| *s).collect();
    assert_eq!(scores, vec![9.0, 7.0, 5.0]);
}

#[test]
fn bounds_compose_into_a_window() {
    let store = seeded_store("feed:13", &[1, 3, 5, 7, 9]);

    let slice = store
        .get_slice(
            "feed:13",
            0,
            None,
            &filters(&[
                ("activity_id__gte", 3i64.into()),
                ("activity_id__lt", 9i64.into()),
            ]),
            &["activity_id".to_string()],
        )
        .unwrap();
    let scores: Vec<f64> = slice.iter().map(|(s, _)| *s).collect();
    assert_eq!(scores, vec![3.0, 5.0, 7.0]);
}

#[test]
fn missing_feed_reads_empty_not_error() {
    let store = TimelineStore::new(Arc::new(MemoryBackend::new()));
    assert!(store.get_slice("feed:none", 0, Some(10), &[], &[]).unwrap().is_empty());
    assert_eq!(store.count("feed:none").unwrap(), 0);
}

#[test]
fn equal_scores_slice_identically_across_queries() {
    let store = TimelineStore::new(Arc::new(MemoryBackend::new()));
    let entries: Vec<(f64, String)> = ["c", "a", "b"]
        .iter()
        .map(|m| (5.0, m.to_string()))
        .collect();
    store.add_many("feed:t", &entries, None).unwrap();

    let first = store.get_slice("feed:t", 0, Some(2), &[], &[]).unwrap();
    for _ in 0..10 {
        let again = store.get_slice("feed:t", 0, Some(2), &[], &[]).unwrap();
        assert_eq!(first, again);
    }
}

/// Backend that fails the test if any method is reached.
struct UnreachableBackend;

impl ScoreBackend for UnreachableBackend {
    fn add_many(&self, _: &str, _: &[(f64, String)]) -> Result<Vec<ItemResult>> {
        panic!("backend must not be touched");
    }
    fn remove_many(&self, _: &str, _: &[String]) -> Result<usize> {
        panic!("backend must not be touched");
    }
    fn get_results(
        &self,
        _: &str,
        _: usize,
        _: Option<usize>,
        _: Option<&str>,
        _: Option<&str>,
        _: bool,
    ) -> Result<Vec<(String, f64)>> {
        panic!("backend must not be touched");
    }
    fn count(&self, _: &str) -> Result<usize> {
        panic!("backend must not be touched");
    }
    fn trim(&self, _: &str, _: usize, _: bool) -> Result<usize> {
        panic!("backend must not be touched");
    }
    fn delete(&self, _: &str) -> Result<()> {
        panic!("backend must not be touched");
    }
    fn contains(&self, _: &str, _: &str) -> Result<bool> {
        panic!("backend must not be touched");
    }
    fn index_of(&self, _: &str, _: &str, _: bool) -> Result<usize> {
        panic!("backend must not be touched");
    }
}

#[test]
fn invalid_ordering_fails_before_the_backend_is_touched() {
    let store = TimelineStore::new(Arc::new(UnreachableBackend));

    let err = store
        .get_slice(
            "feed:13",
            0,
            None,
            &[],
            &["activity_id".to_string(), "-activity_id".to_string()],
        )
        .unwrap_err();
    assert!(matches!(err, FeedError::InvalidOrdering(_)));
}

#[test]
fn invalid_filter_fails_before_the_backend_is_touched() {
    let store = TimelineStore::new(Arc::new(UnreachableBackend));

    let err = store
        .get_slice(
            "feed:13",
            0,
            None,
            &filters(&[("activity_id__between", 5i64.into())]),
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, FeedError::InvalidFilter(_)));

    let err = store
        .get_slice(
            "feed:13",
            0,
            None,
            &filters(&[("activity_id__gte", "five".into())]),
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, FeedError::InvalidFilter(_)));
}
