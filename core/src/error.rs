//! Error types for the platform shim.
//!
//! None of these reach a platform client. Every entry point either answers from
//! fabricated data or forwards to the real backend, so genuine errors are whatever
//! the backend produces. `ShimError` only reports broken bookkeeping invariants,
//! which the dispatchers log and then carry on.

use crate::message::MessageHandle;
use thiserror::Error;

/// Result type for shim bookkeeping operations.
pub type Result<T> = std::result::Result<T, ShimError>;

/// Invariant violations detected by the allocators and the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShimError {
    /// A freshly allocated handle is already owned by a live descriptor.
    #[error("Handle collision: {0} is already owned by a live descriptor")]
    HandleCollision(MessageHandle),

    /// `mark_popped` was called on a descriptor that was already delivered.
    #[error("Descriptor for handle {0} was already popped")]
    AlreadyPopped(MessageHandle),

    /// The handle does not belong to any live descriptor.
    #[error("Unknown synthetic handle: {0}")]
    UnknownHandle(MessageHandle),

    /// The handle's slot was released twice.
    #[error("Handle {0} was already released")]
    DoubleRelease(MessageHandle),

    /// Configuration could not be parsed.
    #[error("Invalid shim configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ShimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
