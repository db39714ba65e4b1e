//! The activity record.
//!
//! An activity is an immutable "actor performed verb on object, optionally
//! targeting another object" event with microsecond-precision time and an
//! open bag of extra context. Activities are written once into the activity
//! store and referenced by id from many timelines; they are never mutated.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::verbs::Verb;

/// Open string -> value mapping carried alongside an activity.
///
/// A BTreeMap keeps encoded output deterministic for identical content.
pub type ExtraContext = BTreeMap<String, serde_json::Value>;

/// An atomic actor-verb-object(-target) event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Id of the actor performing the verb.
    pub actor_id: i64,
    /// The action performed.
    pub verb: Verb,
    /// Id of the object acted on.
    pub object_id: i64,
    /// Optional second object the action is directed at.
    ///
    /// Absence is encoded as 0 on the wire, so a genuine target id of 0
    /// cannot be represented. Known limitation of the token format.
    pub target_id: Option<i64>,
    /// Event time, microsecond precision.
    pub time: DateTime<Utc>,
    /// Extra serializable context; empty is distinct from absent fields
    /// elsewhere and round-trips as empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_context: ExtraContext,
}

impl Activity {
    /// Create an activity stamped with the current time.
    pub fn new(actor_id: i64, verb: Verb, object_id: i64) -> Self {
        Self {
            actor_id,
            verb,
            object_id,
            target_id: None,
            time: Utc::now().trunc_subsecs(6),
            extra_context: ExtraContext::new(),
        }
    }

    /// Set the target object id.
    pub fn with_target(mut self, target_id: i64) -> Self {
        self.target_id = Some(target_id);
        self
    }

    /// Set the event time. Sub-microsecond precision is truncated, matching
    /// what the wire format can carry.
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time.trunc_subsecs(6);
        self
    }

    /// Attach an extra context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_context.insert(key.into(), value);
        self
    }

    /// Time-sortable storage id.
    ///
    /// Layout: `epoch_millis * 10^6 + (object_id mod 10^3) * 10^3 +
    /// (verb_id mod 10^3)`. Monotonic in `time`, deterministic for a given
    /// activity, and unique enough for fan-out as long as one actor does
    /// not publish two activities on the same object in the same
    /// millisecond.
    pub fn serialization_id(&self) -> Result<u64> {
        let millis = self.time.timestamp_millis();
        if millis < 0 {
            return Err(FeedError::InvalidActivity(
                "cannot serialize activities before the epoch".into(),
            ));
        }
        let millis = millis as u64;
        if millis > u64::MAX / 1_000_000 {
            return Err(FeedError::InvalidActivity(format!(
                "activity time {} overflows the id space",
                self.time
            )));
        }
        let object_part = self.object_id.rem_euclid(1_000) as u64;
        let verb_part = u64::from(self.verb.id) % 1_000;
        Ok(millis * 1_000_000 + object_part * 1_000 + verb_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn follow() -> Verb {
        Verb::new(1, "follow")
    }

    #[test]
    fn test_new_truncates_to_micros() {
        let activity = Activity::new(1, follow(), 2);
        let nanos = activity.time.timestamp_subsec_nanos();
        assert_eq!(nanos % 1_000, 0);
    }

    #[test]
    fn test_serialization_id_is_monotonic_in_time() {
        let t0 = Utc.timestamp_opt(1_500_000_000, 0).unwrap();
        let t1 = Utc.timestamp_opt(1_500_000_001, 0).unwrap();
        let earlier = Activity::new(1, follow(), 10).with_time(t0);
        let later = Activity::new(1, follow(), 10).with_time(t1);

        assert!(earlier.serialization_id().unwrap() < later.serialization_id().unwrap());
    }

    #[test]
    fn test_serialization_id_deterministic() {
        let t = Utc.timestamp_opt(1_500_000_000, 0).unwrap();
        let a = Activity::new(1, follow(), 10).with_time(t);
        let b = a.clone();
        assert_eq!(
            a.serialization_id().unwrap(),
            b.serialization_id().unwrap()
        );
    }

    #[test]
    fn test_serialization_id_rejects_pre_epoch() {
        let t = Utc.timestamp_opt(-10, 0).unwrap();
        let activity = Activity::new(1, follow(), 10).with_time(t);
        assert!(matches!(
            activity.serialization_id(),
            Err(FeedError::InvalidActivity(_))
        ));
    }

    #[test]
    fn test_negative_object_id_stays_in_range() {
        let t = Utc.timestamp_opt(1_500_000_000, 0).unwrap();
        let activity = Activity::new(1, follow(), -7).with_time(t);
        // rem_euclid keeps the object part in [0, 1000)
        activity.serialization_id().unwrap();
    }

    #[test]
    fn test_builder_helpers() {
        let activity = Activity::new(1, follow(), 2)
            .with_target(3)
            .with_context("note", serde_json::json!("hi"));

        assert_eq!(activity.target_id, Some(3));
        assert_eq!(activity.extra_context["note"], serde_json::json!("hi"));
    }
}
