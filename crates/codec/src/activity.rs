//! Compact delimited activity codec.
//!
//! Serializer optimized for taking as little storage as possible per
//! activity. The token is six delimiter-joined fields:
//!
//! ```text
//! actor_id,verb_id,object_id,target_id,seconds.micros,extra_blob
//! ```
//!
//! - an absent `target_id` is stored as 0, so a genuine target id of 0
//!   decodes back as absent (known limitation of the format)
//! - time is epoch seconds with exactly six fractional digits
//! - `extra_blob` is empty for an empty `extra_context`; otherwise the
//!   base64 of the byte-serialized mapping, which keeps the delimiter out
//!   of the field by construction
//!
//! Field order and count are a stable on-the-wire contract; any change is
//! a breaking format change requiring a version marker.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use fanout_core::{default_registry, Activity, FeedError, FeedItem, Result, VerbRegistry};

use crate::bytes::{ByteSerializer, MsgPack};
use crate::utils::check_reserved;
use crate::Serializer;

/// Field delimiter of the activity token.
pub const DELIMITER: char = ',';

const FIELD_COUNT: usize = 6;

/// Compact codec for single activities.
///
/// Rejects aggregated payloads with a type-mismatch error. Decoding
/// resolves the verb through the configured registry; an id the registry
/// does not know is a serialization error.
pub struct ActivitySerializer<S: ByteSerializer = MsgPack> {
    registry: Arc<dyn VerbRegistry>,
    bytes: S,
}

impl ActivitySerializer<MsgPack> {
    /// Codec using the process-wide verb registry and MessagePack blobs.
    pub fn new() -> Self {
        Self {
            registry: default_registry(),
            bytes: MsgPack,
        }
    }
}

impl Default for ActivitySerializer<MsgPack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteSerializer> ActivitySerializer<S> {
    /// Codec with an explicit registry and byte serializer.
    pub fn with_parts(registry: Arc<dyn VerbRegistry>, bytes: S) -> Self {
        Self { registry, bytes }
    }

    fn encode_activity(&self, activity: &Activity) -> Result<String> {
        let time = format_epoch_micros(&activity.time);
        let extra_blob = if activity.extra_context.is_empty() {
            String::new()
        } else {
            BASE64.encode(self.bytes.to_bytes(&activity.extra_context)?)
        };
        // base64 never emits the delimiter, but the blob is the one
        // textual field, so it goes through the shared guard anyway
        check_reserved(&extra_blob, &[DELIMITER])?;

        Ok(format!(
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            activity.actor_id,
            activity.verb.id,
            activity.object_id,
            activity.target_id.unwrap_or(0),
            time,
            extra_blob,
            d = DELIMITER,
        ))
    }

    fn decode_activity(&self, token: &str) -> Result<Activity> {
        let parts: Vec<&str> = token.splitn(FIELD_COUNT, DELIMITER).collect();
        if parts.len() != FIELD_COUNT {
            return Err(FeedError::Serialization(format!(
                "expected {FIELD_COUNT} fields, got {}",
                parts.len()
            )));
        }

        let actor_id = parse_i64(parts[0], "actor_id")?;
        let verb_id = parts[1]
            .parse::<u16>()
            .map_err(|e| FeedError::Serialization(format!("bad verb_id {:?}: {e}", parts[1])))?;
        let object_id = parse_i64(parts[2], "object_id")?;
        let raw_target = parse_i64(parts[3], "target_id")?;
        let time = parse_epoch_micros(parts[4])?;

        // 0 is the absence marker, so a stored target of 0 comes back None
        let target_id = (raw_target != 0).then_some(raw_target);

        let verb = self.registry.lookup(verb_id).ok_or_else(|| {
            FeedError::Serialization(format!("unknown verb id {verb_id} in token"))
        })?;

        let extra_context = if parts[5].is_empty() {
            Default::default()
        } else {
            let blob = BASE64
                .decode(parts[5])
                .map_err(|e| FeedError::Serialization(format!("bad extra_context blob: {e}")))?;
            self.bytes.from_bytes(&blob)?
        };

        Ok(Activity {
            actor_id,
            verb,
            object_id,
            target_id,
            time,
            extra_context,
        })
    }
}

impl<S: ByteSerializer> Serializer for ActivitySerializer<S> {
    fn encode(&self, item: &FeedItem) -> Result<String> {
        match item {
            FeedItem::Activity(activity) => self.encode_activity(activity),
            other => Err(FeedError::TypeMismatch {
                expected: "activity",
                actual: other.kind(),
            }),
        }
    }

    fn decode(&self, token: &str) -> Result<FeedItem> {
        Ok(FeedItem::Activity(self.decode_activity(token)?))
    }
}

fn parse_i64(part: &str, field: &str) -> Result<i64> {
    part.parse::<i64>()
        .map_err(|e| FeedError::Serialization(format!("bad {field} {part:?}: {e}")))
}

/// Epoch seconds with exactly six fractional digits, e.g. "1500000000.000042".
fn format_epoch_micros(time: &DateTime<Utc>) -> String {
    let micros = time.timestamp_micros();
    format!(
        "{}.{:06}",
        micros.div_euclid(1_000_000),
        micros.rem_euclid(1_000_000)
    )
}

fn parse_epoch_micros(part: &str) -> Result<DateTime<Utc>> {
    let (secs, frac) = part
        .split_once('.')
        .ok_or_else(|| FeedError::Serialization(format!("bad time field {part:?}")))?;
    let secs = secs
        .parse::<i64>()
        .map_err(|e| FeedError::Serialization(format!("bad time seconds {secs:?}: {e}")))?;
    if frac.len() != 6 {
        return Err(FeedError::Serialization(format!(
            "time field {part:?} must carry six fractional digits"
        )));
    }
    let frac = frac
        .parse::<u32>()
        .map_err(|e| FeedError::Serialization(format!("bad time fraction {frac:?}: {e}")))?;

    let micros = secs
        .checked_mul(1_000_000)
        .and_then(|m| m.checked_add(i64::from(frac)))
        .ok_or_else(|| FeedError::Serialization(format!("time field {part:?} out of range")))?;
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| FeedError::Serialization(format!("time field {part:?} out of range")))
}
