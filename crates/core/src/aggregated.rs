//! Aggregated activities and the codec payload union.
//!
//! An aggregated activity is a group of activities collapsed under one key
//! for display ("12 people followed you"). It exists in two forms:
//!
//! - hydrated: the full activity list is resident
//! - dehydrated: only the activity ids are kept, activities elided
//!
//! The grouping policy itself lives upstream; this module only models the
//! record and its hydrated/dehydrated lifecycle so codecs can round-trip
//! both forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::error::{FeedError, Result};

/// A group of activities collapsed under one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedActivity {
    /// Grouping key shared by all member activities.
    pub group: String,
    /// Member activities. Empty when dehydrated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,
    /// Ids of the member activities. Populated when dehydrated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activity_ids: Vec<u64>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
    /// When an activity was last merged into the group.
    pub updated_at: DateTime<Utc>,
    /// True when the activity list has been elided.
    #[serde(default)]
    pub dehydrated: bool,
}

impl AggregatedActivity {
    /// Create a hydrated group.
    pub fn new(
        group: impl Into<String>,
        activities: Vec<Activity>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            group: group.into(),
            activities,
            activity_ids: Vec::new(),
            created_at,
            updated_at,
            dehydrated: false,
        }
    }

    /// Storage key for this group: `updated_at` as epoch milliseconds.
    pub fn serialization_id(&self) -> Result<u64> {
        let millis = self.updated_at.timestamp_millis();
        if millis < 0 {
            return Err(FeedError::InvalidActivity(
                "cannot serialize groups updated before the epoch".into(),
            ));
        }
        Ok(millis as u64)
    }

    /// Number of activities in the group, in either form.
    pub fn activity_count(&self) -> usize {
        if self.dehydrated {
            self.activity_ids.len()
        } else {
            self.activities.len()
        }
    }

    /// Summary form with the activity list elided. Idempotent.
    pub fn to_dehydrated(&self) -> Result<Self> {
        if self.dehydrated {
            return Ok(self.clone());
        }
        let activity_ids = self
            .activities
            .iter()
            .map(Activity::serialization_id)
            .collect::<Result<Vec<u64>>>()?;
        Ok(Self {
            group: self.group.clone(),
            activities: Vec::new(),
            activity_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
            dehydrated: true,
        })
    }

    /// Restore the activity list, turning a dehydrated group hydrated.
    ///
    /// The activities are looked up by the caller (typically from the
    /// activity store) and must match `activity_ids`.
    pub fn hydrate(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
        self.activity_ids.clear();
        self.dehydrated = false;
    }
}

/// Payload union at the codec boundary.
///
/// A codec is configured for one payload kind; handing it the other kind
/// fails with a type-mismatch input error rather than producing a token
/// the matching decoder cannot read.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedItem {
    /// A single activity.
    Activity(Activity),
    /// An aggregated group.
    Aggregated(AggregatedActivity),
}

impl FeedItem {
    /// Payload kind name, used in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedItem::Activity(_) => "activity",
            FeedItem::Aggregated(_) => "aggregated activity",
        }
    }
}

impl From<Activity> for FeedItem {
    fn from(activity: Activity) -> Self {
        FeedItem::Activity(activity)
    }
}

impl From<AggregatedActivity> for FeedItem {
    fn from(aggregated: AggregatedActivity) -> Self {
        FeedItem::Aggregated(aggregated)
    }
}
