//! Codecs for feed storage payloads.
//!
//! A codec turns a domain payload into a storable string token and back.
//! Storage façades own the codec choice; the codecs themselves know
//! nothing about keys, shards or backends.
//!
//! - [`ActivitySerializer`]: compact delimited token, the activity store
//!   default
//! - [`BinarySerializer`]: whole-activity byte blob
//! - [`AggregatedActivitySerializer`]: group codec, dehydrating by default
//! - [`bytes`]: the pluggable byte-serialization seam used for
//!   `extra_context` blobs and whole groups

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod aggregated;
pub mod binary;
pub mod bytes;
pub mod utils;

use fanout_core::{FeedItem, Result};

pub use activity::{ActivitySerializer, DELIMITER};
pub use aggregated::AggregatedActivitySerializer;
pub use binary::BinarySerializer;
pub use bytes::{ByteSerializer, Json, MsgPack};
pub use utils::check_reserved;

/// Encode/decode pair between a feed payload and its storage token.
///
/// A serializer is configured for one payload kind and must reject the
/// other kind with a type-mismatch error rather than silently encoding it.
pub trait Serializer: Send + Sync {
    /// Encode a payload to its storage token.
    fn encode(&self, item: &FeedItem) -> Result<String>;

    /// Decode a storage token back to a payload.
    fn decode(&self, token: &str) -> Result<FeedItem>;
}
