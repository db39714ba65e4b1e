//! Aggregated activity codec.
//!
//! Stores whole groups as a base64-wrapped byte blob. Two configurations:
//!
//! - dehydrating (the default): `encode` always dehydrates a hydrated
//!   group first, bounding payload size to the id list
//! - payload-carrying: full activities travel inside the blob, so `decode`
//!   returns a group with its activity list already restored

use fanout_core::{AggregatedActivity, FeedError, FeedItem, Result};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::bytes::{ByteSerializer, MsgPack};
use crate::Serializer;

/// Codec for aggregated activity groups.
pub struct AggregatedActivitySerializer<S: ByteSerializer = MsgPack> {
    /// Whether `encode` dehydrates its input before serializing.
    dehydrate: bool,
    bytes: S,
}

impl AggregatedActivitySerializer<MsgPack> {
    /// Dehydrating codec over MessagePack blobs.
    pub fn new() -> Self {
        Self {
            dehydrate: true,
            bytes: MsgPack,
        }
    }

    /// Payload-carrying codec: activities are stored in full.
    pub fn with_payloads() -> Self {
        Self {
            dehydrate: false,
            bytes: MsgPack,
        }
    }
}

impl Default for AggregatedActivitySerializer<MsgPack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteSerializer> AggregatedActivitySerializer<S> {
    /// Codec with an explicit byte serializer.
    pub fn with_parts(dehydrate: bool, bytes: S) -> Self {
        Self { dehydrate, bytes }
    }

    /// Whether this codec dehydrates before encoding.
    pub fn dehydrates(&self) -> bool {
        self.dehydrate
    }
}

impl<S: ByteSerializer> Serializer for AggregatedActivitySerializer<S> {
    fn encode(&self, item: &FeedItem) -> Result<String> {
        let group = match item {
            FeedItem::Aggregated(group) => group,
            other => {
                return Err(FeedError::TypeMismatch {
                    expected: "aggregated activity",
                    actual: other.kind(),
                })
            }
        };

        let dehydrated;
        let to_store = if self.dehydrate && !group.dehydrated {
            dehydrated = group.to_dehydrated()?;
            &dehydrated
        } else {
            group
        };
        Ok(BASE64.encode(self.bytes.to_bytes(to_store)?))
    }

    fn decode(&self, token: &str) -> Result<FeedItem> {
        let blob = BASE64
            .decode(token)
            .map_err(|e| FeedError::Serialization(format!("bad aggregated blob: {e}")))?;
        let group: AggregatedActivity = self.bytes.from_bytes(&blob)?;
        Ok(FeedItem::Aggregated(group))
    }
}
