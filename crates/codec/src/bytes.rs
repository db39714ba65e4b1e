//! Pluggable byte serialization.
//!
//! The activity token embeds its `extra_context` as an opaque blob, and the
//! aggregated codec stores whole dehydrated groups the same way. Both go
//! through this seam so the byte format can be swapped without changing the
//! outer token's field count or delimiter.
//!
//! Implementations must be self-describing: the payloads are schemaless
//! (arbitrary nested values), so formats that need an external schema to
//! decode do not fit here.

use fanout_core::{FeedError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reversible encode/decode of an arbitrary serializable value.
pub trait ByteSerializer: Send + Sync {
    /// Serialize `value` to bytes.
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize a value from `bytes`.
    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// MessagePack byte serializer. The default: compact and self-describing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPack;

impl ByteSerializer for MsgPack {
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(value).map_err(|e| FeedError::Serialization(e.to_string()))
    }

    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        rmp_serde::from_slice(bytes).map_err(|e| FeedError::Serialization(e.to_string()))
    }
}

/// JSON byte serializer. Larger output than MessagePack; useful when the
/// stored blobs need to be human-inspectable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Json;

impl ByteSerializer for Json {
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| FeedError::Serialization(e.to_string()))
    }

    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| FeedError::Serialization(e.to_string()))
    }
}
