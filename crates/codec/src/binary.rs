//! Whole-object binary codec.
//!
//! Serializes the entire activity through the byte serializer and wraps it
//! in base64. Larger than the compact delimited token but schema-free:
//! fields added to `Activity` travel along without a format change. Useful
//! for storage use cases where payload size matters less than flexibility.

use fanout_core::{Activity, FeedError, FeedItem, Result};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::bytes::{ByteSerializer, MsgPack};
use crate::Serializer;

/// Whole-activity codec over a byte serializer.
pub struct BinarySerializer<S: ByteSerializer = MsgPack> {
    bytes: S,
}

impl BinarySerializer<MsgPack> {
    /// MessagePack-backed binary codec.
    pub fn new() -> Self {
        Self { bytes: MsgPack }
    }
}

impl Default for BinarySerializer<MsgPack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteSerializer> BinarySerializer<S> {
    /// Binary codec with an explicit byte serializer.
    pub fn with_bytes(bytes: S) -> Self {
        Self { bytes }
    }
}

impl<S: ByteSerializer> Serializer for BinarySerializer<S> {
    fn encode(&self, item: &FeedItem) -> Result<String> {
        match item {
            FeedItem::Activity(activity) => {
                Ok(BASE64.encode(self.bytes.to_bytes(activity)?))
            }
            other => Err(FeedError::TypeMismatch {
                expected: "activity",
                actual: other.kind(),
            }),
        }
    }

    fn decode(&self, token: &str) -> Result<FeedItem> {
        let blob = BASE64
            .decode(token)
            .map_err(|e| FeedError::Serialization(format!("bad activity blob: {e}")))?;
        let activity: Activity = self.bytes.from_bytes(&blob)?;
        Ok(FeedItem::Activity(activity))
    }
}
