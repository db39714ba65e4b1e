//! Public types for the fanoutdb unified API.
//!
//! This module re-exports types from internal crates with a clean public
//! interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Domain records
pub use fanout_core::{Activity, AggregatedActivity, ExtraContext, FeedItem};

// Verbs
pub use fanout_core::{default_registry, InMemoryVerbRegistry, Verb, VerbRegistry};

// Errors
pub use fanout_core::{BackendError, FeedError, Result};

// Metrics collaborator interface
pub use fanout_core::{Metrics, MetricsTimer, NoopMetrics, TracingMetrics};

// Codecs
pub use fanout_codec::{
    check_reserved, ActivitySerializer, AggregatedActivitySerializer, BinarySerializer,
    ByteSerializer, Json, MsgPack, Serializer, DELIMITER,
};

// Storage structures and façades
pub use fanout_storage::{
    ActivityStore, FilterValue, HashBackend, ItemError, ItemResult, MemoryBackend, ScoreBackend,
    ScoreBound, ShardedHash, ShardingConfig, SortedRange, TimelineBatch, TimelineConfig,
    TimelineStore, TranslatedQuery,
};
