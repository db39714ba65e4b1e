//! Error taxonomy for the feed storage core.
//!
//! Three families of failures, kept distinct so callers can react
//! appropriately:
//!
//! - Input errors (bad filter keys, ordering args, reserved characters,
//!   payload type mismatches) are fatal and raised before any backend call.
//! - Not-found conditions (rank lookup of an absent member) are reported as
//!   a distinct outcome, never conflated with a zero-valued success.
//! - Backend failures are carried through unchanged so the caller's
//!   retry/backoff policy can act on the original error.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Boxed backend error, propagated without wrapping semantics.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors surfaced by the feed storage core.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Encoding or decoding a payload failed.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A codec was handed a payload of the wrong runtime type.
    #[error("expected {expected} payload, got {actual}")]
    TypeMismatch {
        /// Payload kind the codec is configured for.
        expected: &'static str,
        /// Payload kind it actually received.
        actual: &'static str,
    },

    /// A textual field contained a character reserved by the token format.
    #[error("encountered reserved character {character:?} in {value:?}")]
    ReservedCharacter {
        /// The offending character.
        character: char,
        /// The value it was found in.
        value: String,
    },

    /// An activity cannot be given a storage id (e.g. pre-epoch time).
    #[error("invalid activity: {0}")]
    InvalidActivity(String),

    /// A filter argument was unrecognized or non-numeric.
    #[error("invalid filter kwargs: {0}")]
    InvalidFilter(String),

    /// An ordering argument was unrecognized, or more than one was given.
    #[error("invalid order kwargs: {0}")]
    InvalidOrdering(String),

    /// Rank lookup of a member that is not in the structure.
    #[error("member {member:?} not found in {key:?}")]
    NotFound {
        /// The structure key that was queried.
        key: String,
        /// The member that was looked up.
        member: String,
    },

    /// A single item inside a batched score-set write failed.
    #[error("batch item {member:?} failed: {reason}")]
    BatchItem {
        /// The member whose write failed.
        member: String,
        /// Backend-reported reason.
        reason: String,
    },

    /// A backend/connection failure, propagated unchanged.
    #[error("backend failure: {0}")]
    Backend(#[source] BackendError),
}

impl FeedError {
    /// Wrap a backend error for propagation.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FeedError::Backend(Box::new(err))
    }

    /// True for caller-mistake errors that must never be retried.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FeedError::TypeMismatch { .. }
                | FeedError::ReservedCharacter { .. }
                | FeedError::InvalidActivity(_)
                | FeedError::InvalidFilter(_)
                | FeedError::InvalidOrdering(_)
        )
    }
}
