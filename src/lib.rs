//! fanoutdb — storage and fan-out core for activity feeds.
//!
//! Persists individual activities (actor performed verb on object) and
//! maintains per-recipient ordered timelines referencing them, at a scale
//! where one activity may be written into millions of timelines.
//!
//! The pieces, bottom up:
//!
//! - codecs turn activities and aggregated groups into compact storage
//!   tokens and back ([`ActivitySerializer`], [`AggregatedActivitySerializer`])
//! - a sharded hash stores activities by id; a score-ordered structure
//!   stores each feed's (score, activity id) entries
//! - the [`ActivityStore`] and [`TimelineStore`] façades own codec choice,
//!   filter translation and the batch/pipelining contract, and run
//!   unchanged over any backend implementing the capability traits
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fanoutdb::{
//!     Activity, ActivityStore, MemoryBackend, TimelineStore, Verb,
//! };
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let activities = ActivityStore::new(backend.clone());
//! let timelines = TimelineStore::new(backend);
//!
//! let activity = Activity::new(7, Verb::new(1, "follow"), 1300);
//! let id = activity.serialization_id()?;
//!
//! // persist once, fan out a reference per follower
//! activities.add(&[(id, activity)])?;
//! let mut batch = timelines.get_batch_interface();
//! for follower in [1, 2, 3] {
//!     let key = format!("feed:{follower}");
//!     timelines.add_many(&key, &[(id as f64, id.to_string())], Some(&mut batch))?;
//! }
//! for outcome in batch.commit() {
//!     outcome?;
//! }
//!
//! assert_eq!(timelines.count("feed:2")?, 1);
//! # Ok::<(), fanoutdb::FeedError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod types;

pub use types::*;
