//! Core domain model for the fanout feed storage workspace.
//!
//! This crate defines the records the storage layer persists and the
//! cross-cutting contracts the other crates build on:
//!
//! - Activity / AggregatedActivity: the events feeds are made of
//! - Verb + VerbRegistry: interned actions, resolved by id on decode
//! - FeedError: the shared error taxonomy
//! - Metrics: the collaborator interface for counters and timing spans

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod aggregated;
pub mod error;
pub mod metrics;
pub mod verbs;

pub use activity::{Activity, ExtraContext};
pub use aggregated::{AggregatedActivity, FeedItem};
pub use error::{BackendError, FeedError, Result};
pub use metrics::{Metrics, MetricsTimer, NoopMetrics, TracingMetrics};
pub use verbs::{default_registry, InMemoryVerbRegistry, Verb, VerbRegistry};
