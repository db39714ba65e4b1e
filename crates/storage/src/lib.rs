//! Storage layer for feed activities and timelines.
//!
//! Two backend-agnostic structures and the façades over them:
//!
//! - [`ShardedHash`] + [`ActivityStore`]: activity-by-id storage, sharded
//!   across physical keys
//! - [`SortedRange`] + [`TimelineStore`]: per-feed score-ordered
//!   timelines with range/filter queries and trimming
//!
//! Physical backends implement the capability traits in [`backend`];
//! [`MemoryBackend`] is the in-process reference implementation. Façades
//! own codec choice and filter translation, so feed semantics stay
//! identical across backends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod backend;
pub mod filters;
pub mod memory;
pub mod sharded;
pub mod sorted;
pub mod timeline;

pub use activity::ActivityStore;
pub use backend::{HashBackend, ItemError, ItemResult, ScoreBackend, ScoreBound};
pub use filters::{translate_filters, FilterValue, TranslatedQuery, VALID_FILTER_KWARGS};
pub use memory::MemoryBackend;
pub use sharded::{ShardedHash, ShardingConfig};
pub use sorted::SortedRange;
pub use timeline::{TimelineBatch, TimelineConfig, TimelineStore};
